#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub with_hashes: bool,
    pub dev: bool,
    pub extras: Vec<String>,
    pub with_credentials: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            with_hashes: true,
            dev: false,
            extras: Vec::new(),
            with_credentials: false,
        }
    }
}
