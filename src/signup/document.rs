use tracing::info;

/// The browser refused a new browsing context
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpenBlocked;

/// Where the preview document ended up
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DocumentAccess {
    NewContext(String),
    CurrentContext(String),
}

impl DocumentAccess {
    pub fn path(&self) -> &str {
        match self {
            DocumentAccess::NewContext(path) | DocumentAccess::CurrentContext(path) => path,
        }
    }
}

/// Something able to show the preview document to the visitor
pub trait DocumentOpener: Send + Sync {
    fn open_in_new_context(&self, path: &str) -> Result<(), OpenBlocked>;
}

/// Open the document, navigating the current context when a new one is refused
pub fn open_document(opener: &dyn DocumentOpener, path: &str) -> DocumentAccess {
    match opener.open_in_new_context(path) {
        Ok(()) => DocumentAccess::NewContext(path.to_owned()),
        Err(OpenBlocked) => {
            info!("New context refused for {}, navigating current one", path);
            DocumentAccess::CurrentContext(path.to_owned())
        }
    }
}

/// Opener for HTTP responses
/// A response cannot spawn a browsing context: the optimistic form already posts into a new
/// tab, so the response navigates whichever context the browser gave it
#[derive(Clone, Copy, Debug, Default)]
pub struct ResponseOpener;

impl DocumentOpener for ResponseOpener {
    fn open_in_new_context(&self, _path: &str) -> Result<(), OpenBlocked> {
        Err(OpenBlocked)
    }
}
