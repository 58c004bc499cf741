use crate::error::{ExportError, Result};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Parse a CSS selector, reporting failures as `ExportError::Selector`
pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ExportError::Selector {
        pattern: css.to_string(),
        reason: e.to_string(),
    })
}

/// Concatenate text nodes, collapse whitespace runs and trim
pub(crate) fn clean_text<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    let raw: String = parts.collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A fetched HTML document and the URL it was served from
#[derive(Debug, Clone)]
pub struct Page {
    pub url: Url,
    pub body: String,
}

/// An `<a href>` on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub href: String,
    /// Visible text, whitespace-normalised
    pub text: String,
}

impl Page {
    pub fn new(url: Url, body: impl Into<String>) -> Self {
        Self {
            url,
            body: body.into(),
        }
    }

    pub fn document(&self) -> Html {
        Html::parse_document(&self.body)
    }

    /// Resolve a possibly relative href against this page's URL
    pub fn resolve(&self, href: &str) -> Result<Url> {
        self.url.join(href).map_err(|source| ExportError::InvalidUrl {
            href: href.to_string(),
            base: self.url.to_string(),
            source,
        })
    }

    /// All links on the page, in document order
    pub fn links(&self) -> Result<Vec<Link>> {
        let anchor = selector("a[href]")?;
        let document = self.document();

        let links = document
            .select(&anchor)
            .filter_map(|a| {
                a.value().attr("href").map(|href| Link {
                    href: href.to_string(),
                    text: clean_text(a.text()),
                })
            })
            .collect();

        Ok(links)
    }

    /// Target of a `<meta http-equiv="refresh">` redirect, if the page declares one
    pub fn meta_refresh(&self) -> Result<Option<Url>> {
        let meta = selector("meta[http-equiv][content]")?;
        let document = self.document();

        let target = document
            .select(&meta)
            .filter(|m| {
                m.value()
                    .attr("http-equiv")
                    .is_some_and(|v| v.trim().eq_ignore_ascii_case("refresh"))
            })
            .find_map(|m| m.value().attr("content").and_then(refresh_target))
            .map(str::to_string);

        target.map(|href| self.resolve(&href)).transpose()
    }

    /// The form with the given `name` attribute
    pub fn form(&self, name: &str) -> Result<Option<Form>> {
        let forms = selector("form")?;
        let document = self.document();

        let found = document
            .select(&forms)
            .find(|f| f.value().attr("name") == Some(name));

        match found {
            Some(element) => Form::from_element(element, name, self).map(Some),
            None => Ok(None),
        }
    }
}

/// Pull the URL out of a refresh directive such as `5; URL='/next'`
fn refresh_target(content: &str) -> Option<&str> {
    let (_, rest) = content.split_once(';').or_else(|| content.split_once(','))?;
    let mut rest = rest.trim_start();

    if rest.get(..3).is_some_and(|p| p.eq_ignore_ascii_case("url")) {
        // Without `=` the "url" prefix is part of a relative target
        if let Some(value) = rest[3..].trim_start().strip_prefix('=') {
            rest = value.trim_start();
        }
    }

    let rest = rest.trim_end();
    let rest = rest
        .strip_prefix('\'')
        .map(|r| r.trim_end_matches('\''))
        .or_else(|| rest.strip_prefix('"').map(|r| r.trim_end_matches('"')))
        .unwrap_or(rest)
        .trim();

    if rest.is_empty() {
        None
    } else {
        Some(rest)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMethod {
    Get,
    Post,
}

/// An HTML form with the values a browser would submit
#[derive(Debug, Clone)]
pub struct Form {
    pub name: String,
    pub action: Url,
    pub method: FormMethod,
    fields: Vec<(String, String)>,
}

impl Form {
    fn from_element(element: ElementRef<'_>, name: &str, page: &Page) -> Result<Self> {
        let action = match element.value().attr("action").map(str::trim) {
            Some(action) if !action.is_empty() => page.resolve(action)?,
            _ => page.url.clone(),
        };

        let method = match element.value().attr("method") {
            Some(m) if m.trim().eq_ignore_ascii_case("post") => FormMethod::Post,
            _ => FormMethod::Get,
        };

        let controls = selector("input[name], textarea[name], select[name]")?;
        let option = selector("option")?;

        let mut fields = Vec::new();
        for control in element.select(&controls) {
            let el = control.value();
            let Some(field) = el.attr("name") else {
                continue;
            };

            let value = match el.name() {
                "input" => {
                    let kind = el.attr("type").unwrap_or("text").to_ascii_lowercase();
                    match kind.as_str() {
                        "submit" | "button" | "image" | "reset" | "file" => continue,
                        "checkbox" | "radio" if el.attr("checked").is_none() => continue,
                        "checkbox" | "radio" => el.attr("value").unwrap_or("on").to_string(),
                        _ => el.attr("value").unwrap_or_default().to_string(),
                    }
                }
                "textarea" => control.text().collect::<String>(),
                "select" => {
                    let options: Vec<_> = control.select(&option).collect();
                    let chosen = options
                        .iter()
                        .find(|o| o.value().attr("selected").is_some())
                        .or_else(|| options.first());
                    match chosen {
                        Some(o) => o
                            .value()
                            .attr("value")
                            .map(str::to_string)
                            .unwrap_or_else(|| clean_text(o.text())),
                        None => continue,
                    }
                }
                _ => continue,
            };

            fields.push((field.to_string(), value));
        }

        Ok(Self {
            name: name.to_string(),
            action,
            method,
            fields,
        })
    }

    /// Name/value pairs in document order
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    #[cfg(test)]
    pub fn value(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    /// Overwrite an existing field. Returns false if the form has no such field.
    pub fn set(&mut self, field: &str, value: &str) -> bool {
        match self.fields.iter_mut().find(|(name, _)| name == field) {
            Some(entry) => {
                entry.1 = value.to_string();
                true
            }
            None => false,
        }
    }
}
