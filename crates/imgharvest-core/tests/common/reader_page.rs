//! Builds reader-page HTML shaped like the real site: an image container,
//! optional inline token script and unrelated surrounding markup.

/// One `<img>` in the container: a real source, a placeholder asset, or no `src`.
#[derive(Debug, Clone, Copy)]
pub enum Img<'a> {
    Real(&'a str),
    Blank,
    Spinner,
    NoSrc,
}

pub struct ReaderPage<'a> {
    images: Vec<Img<'a>>,
    tokens: Option<Vec<&'a str>>,
    variable: &'a str,
    new_array: bool,
}

impl<'a> ReaderPage<'a> {
    pub fn new(images: Vec<Img<'a>>) -> Self {
        Self {
            images,
            tokens: None,
            variable: "_q1HQcHOD6h8",
            new_array: false,
        }
    }

    pub fn with_tokens(mut self, tokens: Vec<&'a str>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Declare the token array as `new Array()` instead of `[]`.
    pub fn with_new_array(mut self) -> Self {
        self.new_array = true;
        self
    }

    pub fn render(&self) -> String {
        let imgs: String = self
            .images
            .iter()
            .map(|img| match img {
                Img::Real(src) => format!("<img src=\"{src}\" style=\"width:100%\">\n"),
                Img::Blank => "<img src=\"/Content/Images/blank.gif\">\n".to_string(),
                Img::Spinner => "<img src=\"/Content/Images/loading.gif\">\n".to_string(),
                Img::NoSrc => "<img>\n".to_string(),
            })
            .collect();
        let script = match &self.tokens {
            Some(tokens) => {
                let pushes: String = tokens
                    .iter()
                    .map(|t| format!("{}.push('{}');\n", self.variable, t))
                    .collect();
                let init = if self.new_array { "new Array()" } else { "[]" };
                format!(
                    "<script type=\"text/javascript\">\nvar {} = {};\n{}</script>",
                    self.variable, init, pushes
                )
            }
            None => String::new(),
        };
        format!(
            r#"<!DOCTYPE html>
<html><head><title>Reader</title>
<script src="/Scripts/rguard.min.js"></script>
{script}
</head><body>
<select id="selectReadType"><option value="1" selected>All pages</option></select>
<div id="divImage">
{imgs}</div>
<div id="footer"><img src="https://site.test/logo.png"></div>
</body></html>"#
        )
    }
}
