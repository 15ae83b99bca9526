use anyhow::{Context, Result};
use url::Url;

/// Where a chosen item's detail page is shown.
pub trait BrowserView: Send + Sync {
    fn open(&self, url: &Url) -> Result<()>;
}

/// Hands the URL to the platform's default browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl BrowserView for SystemBrowser {
    fn open(&self, url: &Url) -> Result<()> {
        tracing::info!(url = %url, "browser.open");
        open::that_detached(url.as_str())
            .with_context(|| format!("failed to launch a browser for {url}"))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records every URL it is asked to open.
    #[derive(Clone, Default)]
    pub(crate) struct RecordingBrowser {
        pub opened: Arc<Mutex<Vec<Url>>>,
        pub fail: bool,
    }

    impl BrowserView for RecordingBrowser {
        fn open(&self, url: &Url) -> Result<()> {
            if self.fail {
                anyhow::bail!("no display");
            }
            self.opened.lock().unwrap().push(url.clone());
            Ok(())
        }
    }

    #[test]
    fn recording_browser_sees_exact_url() {
        let browser = RecordingBrowser::default();
        let url = Url::parse("https://sysbird.jp/toriko/?p=1234").unwrap();
        browser.open(&url).unwrap();
        assert_eq!(browser.opened.lock().unwrap().as_slice(), &[url]);
    }

    #[test]
    fn browser_is_object_safe() {
        let b: Box<dyn BrowserView> = Box::new(RecordingBrowser {
            fail: true,
            ..Default::default()
        });
        let err = b
            .open(&Url::parse("https://example.com/").unwrap())
            .unwrap_err();
        assert!(err.to_string().contains("no display"));
    }
}
