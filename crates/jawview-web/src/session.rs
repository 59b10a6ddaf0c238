//! Viewer session
//!
//! The pair list, the current position and the last rendered frame. Every
//! navigation renders the current pair again from scratch.

use jawview_core::{Browser, PatientPair};
use jawview_renderer::{Renderer, encode_png};
use serde::Serialize;

use crate::WebResult;

/// Status line shown above the view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusView {
    /// Zero-based position
    pub index: usize,
    pub pair_id: Option<u64>,
    pub pairs_len: usize,
    pub label: String,
}

/// Navigation state plus the PNG of the current pair
pub struct Session {
    browser: Browser<PatientPair>,
    renderer: Renderer,
    frame: Option<Vec<u8>>,
}

impl Session {
    /// Create a session and render the first pair
    pub fn new(pairs: Vec<PatientPair>, renderer: Renderer) -> WebResult<Self> {
        let mut session = Self {
            browser: Browser::new(pairs),
            renderer,
            frame: None,
        };
        session.render_current()?;
        Ok(session)
    }

    pub fn status(&self) -> StatusView {
        let status = self.browser.status(|pair| pair.id.value());
        let label = match status.pair_id {
            Some(id) => format!("Pair: {}  [{}/{}]", id, status.index + 1, status.pairs_len),
            None => String::from("No pairs to display"),
        };
        StatusView {
            index: status.index,
            pair_id: status.pair_id,
            pairs_len: status.pairs_len,
            label,
        }
    }

    /// PNG bytes of the current pair, if there is one
    pub fn frame(&self) -> Option<&[u8]> {
        self.frame.as_deref()
    }

    pub fn next(&mut self) -> WebResult<StatusView> {
        self.browser.next();
        self.render_current()?;
        Ok(self.status())
    }

    pub fn prev(&mut self) -> WebResult<StatusView> {
        self.browser.prev();
        self.render_current()?;
        Ok(self.status())
    }

    /// Jump to a typed index; text that is not an integer leaves
    /// everything as it was.
    pub fn jump(&mut self, input: &str) -> WebResult<StatusView> {
        if self.browser.jump(input).is_none() {
            log::debug!("ignoring jump to {:?}", input);
            return Ok(self.status());
        }
        self.render_current()?;
        Ok(self.status())
    }

    fn render_current(&mut self) -> WebResult<()> {
        self.frame = match self.browser.current() {
            Some(pair) => {
                let image = self.renderer.render_pair(pair);
                Some(encode_png(&image)?)
            }
            None => None,
        };
        Ok(())
    }
}
