use minijinja::{context, Environment};

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");

/// Renders the recommendation page shell. The container markup is inserted
/// as-is; it is escaped when built.
pub struct PageRenderer {
    env: Environment<'static>,
    site_name: String,
}

impl PageRenderer {
    pub fn new(site_name: impl Into<String>) -> Result<Self, PageError> {
        let mut env = Environment::new();
        env.add_template("index.html", INDEX_TEMPLATE)?;
        Ok(Self {
            env,
            site_name: site_name.into(),
        })
    }

    pub fn render(&self, title: &str, recommendations: &str) -> Result<String, PageError> {
        let template = self.env.get_template("index.html")?;
        let html = template.render(context! {
            site_name => &self.site_name,
            title => title,
            recommendations => recommendations,
        })?;
        Ok(html)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}
