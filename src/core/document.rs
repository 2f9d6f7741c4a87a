use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
    pub rel: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Style {
    pub href: String,
    pub rel: String,
    pub media: String,
}

/// Page metadata collected while a request is handled.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Document {
    title: String,
    description: String,
    keywords: String,
    links: Vec<Link>,
    styles: Vec<Style>,
    scripts: Vec<(String, String)>,
}

impl Document {
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_keywords(&mut self, keywords: impl Into<String>) {
        self.keywords = keywords.into();
    }

    pub fn keywords(&self) -> &str {
        &self.keywords
    }

    /// 同一個 href 只保留最後一次
    pub fn add_link(&mut self, href: impl Into<String>, rel: impl Into<String>) {
        let href = href.into();
        self.links.retain(|l| l.href != href);
        self.links.push(Link {
            href,
            rel: rel.into(),
        });
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn add_style(&mut self, href: impl Into<String>, rel: &str, media: &str) {
        let href = href.into();
        self.styles.retain(|s| s.href != href);
        self.styles.push(Style {
            href,
            rel: rel.to_string(),
            media: media.to_string(),
        });
    }

    pub fn styles(&self) -> &[Style] {
        &self.styles
    }

    pub fn add_script(&mut self, href: impl Into<String>, position: &str) {
        let href = href.into();
        if !self.scripts.iter().any(|(p, h)| p == position && *h == href) {
            self.scripts.push((position.to_string(), href));
        }
    }

    /// Scripts for one position (`header`, `footer`, ...) in insertion order.
    pub fn scripts(&self, position: &str) -> Vec<&str> {
        self.scripts
            .iter()
            .filter(|(p, _)| p == position)
            .map(|(_, h)| h.as_str())
            .collect()
    }
}
