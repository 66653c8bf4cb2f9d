/// The parts of an incoming HTTP request the renderers look at.
///
/// `script_path` is the handler's own URL (links generated by the tree and the
/// listing point back at it), `path_info` is the extra path after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    script_path: String,
    path_info: Option<String>,
    params: Vec<(String, String)>,
}

impl Request {
    /// Create a request with no path info and no parameters.
    pub fn new(script_path: impl Into<String>) -> Self {
        Self {
            script_path: script_path.into(),
            path_info: None,
            params: Vec::new(),
        }
    }

    /// Build a request from a raw `application/x-www-form-urlencoded` query string.
    pub fn from_query(
        script_path: impl Into<String>,
        path_info: Option<&str>,
        query: &str,
    ) -> Self {
        let params = form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self {
            script_path: script_path.into(),
            path_info: path_info.map(str::to_string),
            params,
        }
    }

    pub fn with_path_info(mut self, path_info: impl Into<String>) -> Self {
        self.path_info = Some(path_info.into());
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    pub fn script_path(&self) -> &str {
        &self.script_path
    }

    pub fn path_info(&self) -> Option<&str> {
        self.path_info.as_deref()
    }

    /// First value of the named parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}
