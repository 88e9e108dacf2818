use tera::{Context, Tera};

/// Page and email templates, compiled once at startup.
pub struct Templates {
    tera: Tera,
}

impl Templates {
    pub fn load(glob: &str) -> Result<Self, tera::Error> {
        let tera = Tera::new(glob)?;
        tracing::info!(
            templates = tera.get_template_names().count(),
            "Loaded templates"
        );
        Ok(Self { tera })
    }

    pub fn from_tera(tera: Tera) -> Self {
        Self { tera }
    }

    pub fn render(&self, name: &str, ctx: &Context) -> Result<String, tera::Error> {
        self.tera.render(name, ctx)
    }
}
