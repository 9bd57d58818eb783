use minijinja::HtmlEscape;

use crate::recommend::Recommendation;

pub const NOT_FOUND_MESSAGE: &str = "Sorry, no recommendations found. Please try another movie.";
pub const FETCH_ERROR_MESSAGE: &str =
    "An error occurred while fetching recommendations. Please try again later.";

pub fn render_error(message: &str) -> String {
    format!("<p class=\"error\">{}</p>", HtmlEscape(message))
}

pub fn render_movie(movie: &Recommendation) -> String {
    format!(
        "<div class=\"movie\"><h3>{}</h3><p>{}</p></div>",
        HtmlEscape(&movie.original_title),
        HtmlEscape(&movie.overview)
    )
}
