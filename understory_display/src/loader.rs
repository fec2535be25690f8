// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loader nodes: containers whose single child is fetched image content.
//!
//! Fetching itself is the host's job. The host starts a request with
//! [`Stage::load`] and reports back through [`Stage::loader_open`],
//! [`Stage::loader_progress`], [`Stage::loader_complete`] and
//! [`Stage::loader_fail`]. Each report updates the loader's [`LoaderInfo`]
//! and dispatches the matching event on the loader node.

use tracing::{debug, warn};
use understory_event::{EventPayload, EventType};

use crate::bitmap::BitmapData;
use crate::error::{DisplayError, Result};
use crate::node::Content;
use crate::stage::Stage;
use crate::types::NodeId;

/// Where a loader is in its request lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing requested, or the request was just issued.
    #[default]
    Idle,
    /// The host opened the request.
    Open,
    /// Bytes are arriving.
    Loading,
    /// Content is attached.
    Complete,
    /// The request failed.
    Failed,
}

/// Request state and loaded content of a loader node.
#[derive(Clone, Debug, Default)]
pub struct LoaderInfo {
    url: Option<String>,
    status: LoadStatus,
    bytes_loaded: u64,
    bytes_total: u64,
    width: u32,
    height: u32,
    content: Option<NodeId>,
    error: Option<String>,
}

impl LoaderInfo {
    /// The requested URL.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Current lifecycle status.
    pub fn status(&self) -> LoadStatus {
        self.status
    }

    /// Bytes received so far.
    pub fn bytes_loaded(&self) -> u64 {
        self.bytes_loaded
    }

    /// Expected size, `0` if unknown.
    pub fn bytes_total(&self) -> u64 {
        self.bytes_total
    }

    /// Width of the loaded content.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the loaded content.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The bitmap node holding the loaded content.
    pub fn content(&self) -> Option<NodeId> {
        self.content
    }

    /// Message of the last failure.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl Stage {
    /// The request state of a loader.
    pub fn loader_info(&self, loader: NodeId) -> Result<&LoaderInfo> {
        match &self.node(loader)?.content {
            Content::Loader(info) => Ok(info),
            _ => Err(DisplayError::NotALoader(loader)),
        }
    }

    fn loader_info_mut(&mut self, loader: NodeId) -> Result<&mut LoaderInfo> {
        match &mut self.node_mut(loader)?.content {
            Content::Loader(info) => Ok(info),
            _ => Err(DisplayError::NotALoader(loader)),
        }
    }

    /// Start a request for `url`. Earlier progress and errors are forgotten;
    /// attached content stays until new content completes.
    pub fn load(&mut self, loader: NodeId, url: impl Into<String>) -> Result<()> {
        let info = self.loader_info_mut(loader)?;
        info.url = Some(url.into());
        info.status = LoadStatus::Idle;
        info.bytes_loaded = 0;
        info.bytes_total = 0;
        info.error = None;
        debug!(?loader, url = info.url.as_deref(), "load requested");
        Ok(())
    }

    /// Report that the request opened; dispatches `open`.
    pub fn loader_open(&mut self, loader: NodeId) -> Result<()> {
        self.loader_info_mut(loader)?.status = LoadStatus::Open;
        self.notify(loader, EventType::OPEN, EventPayload::None);
        Ok(())
    }

    /// Report received bytes; dispatches `progress`.
    pub fn loader_progress(&mut self, loader: NodeId, loaded: u64, total: u64) -> Result<()> {
        let info = self.loader_info_mut(loader)?;
        info.status = LoadStatus::Loading;
        info.bytes_loaded = loaded;
        info.bytes_total = total;
        self.notify(
            loader,
            EventType::PROGRESS,
            EventPayload::Progress { loaded, total },
        );
        Ok(())
    }

    /// Report decoded content. It replaces any previous content as the
    /// loader's only child, then `complete` is dispatched.
    pub fn loader_complete(&mut self, loader: NodeId, data: BitmapData) -> Result<()> {
        self.loader_info(loader)?;
        self.drop_loader_content(loader);

        let (width, height) = (data.width(), data.height());
        let bitmap = self.create_bitmap(Some(data));
        self.attach(loader, bitmap, 0);

        let info = self.loader_info_mut(loader)?;
        info.status = LoadStatus::Complete;
        info.width = width;
        info.height = height;
        info.content = Some(bitmap);
        debug!(?loader, width, height, "load complete");
        self.notify(loader, EventType::COMPLETE, EventPayload::None);
        Ok(())
    }

    /// Report a failed request; dispatches `ioError` with `message`.
    pub fn loader_fail(&mut self, loader: NodeId, message: impl Into<String>) -> Result<()> {
        let message = message.into();
        let info = self.loader_info_mut(loader)?;
        info.status = LoadStatus::Failed;
        info.error = Some(message.clone());
        warn!(?loader, url = info.url.as_deref(), %message, "load failed");
        self.notify(loader, EventType::IO_ERROR, EventPayload::Error(message));
        Ok(())
    }

    /// Detach and free loaded content and reset the loader to idle.
    pub fn unload(&mut self, loader: NodeId) -> Result<()> {
        self.loader_info(loader)?;
        self.drop_loader_content(loader);
        let info = self.loader_info_mut(loader)?;
        let url = info.url.take();
        *info = LoaderInfo {
            url,
            ..LoaderInfo::default()
        };
        Ok(())
    }

    fn drop_loader_content(&mut self, loader: NodeId) {
        let children = self.tree.children_of(loader).to_vec();
        for child in children {
            self.detach(loader, child);
            self.tree.remove_subtree(child);
        }
        if let Ok(info) = self.loader_info_mut(loader) {
            info.content = None;
            info.width = 0;
            info.height = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use understory_event::Outcome;

    use super::*;
    use crate::stage::tests::stage;

    #[test]
    fn lifecycle_events_in_order() {
        let mut stage = stage();
        let loader = stage.create_loader();
        stage.add_child(stage.root(), loader).unwrap();

        let log = Rc::new(RefCell::new(Vec::new()));
        for kind in [
            EventType::OPEN,
            EventType::PROGRESS,
            EventType::COMPLETE,
            EventType::ADDED_TO_STAGE,
        ] {
            let log = log.clone();
            stage
                .add_event_listener(loader, kind, move |_, e| {
                    log.borrow_mut().push((e.kind.clone(), e.payload.clone()));
                    Outcome::Continue
                })
                .unwrap();
        }

        stage.load(loader, "images/a.png").unwrap();
        stage.loader_open(loader).unwrap();
        stage.loader_progress(loader, 10, 40).unwrap();
        stage
            .loader_complete(loader, BitmapData::new(4, 3, false, 0x00FF00))
            .unwrap();

        let log = log.borrow();
        assert_eq!(log.len(), 3);
        assert_eq!(log[0].0, EventType::OPEN);
        assert_eq!(
            log[1].1,
            EventPayload::Progress {
                loaded: 10,
                total: 40
            }
        );
        assert_eq!(log[2].0, EventType::COMPLETE);

        let info = stage.loader_info(loader).unwrap();
        assert_eq!(info.status(), LoadStatus::Complete);
        assert_eq!(info.url(), Some("images/a.png"));
        assert_eq!((info.width(), info.height()), (4, 3));
        let content = info.content().unwrap();
        assert_eq!(stage.children(loader), [content]);
        assert_eq!(stage.width(loader), Some(4.0));
    }

    #[test]
    fn new_content_replaces_old() {
        let mut stage = stage();
        let loader = stage.create_loader();
        stage
            .loader_complete(loader, BitmapData::new(1, 1, true, 0))
            .unwrap();
        let first = stage.loader_info(loader).unwrap().content().unwrap();
        stage
            .loader_complete(loader, BitmapData::new(2, 2, true, 0))
            .unwrap();
        assert!(!stage.is_alive(first));
        assert_eq!(stage.num_children(loader), 1);
    }

    #[test]
    fn failure_reports_message() {
        let mut stage = stage();
        let loader = stage.create_loader();
        let seen = Rc::new(RefCell::new(None));
        let s = seen.clone();
        stage
            .add_event_listener(loader, EventType::IO_ERROR, move |_, e| {
                *s.borrow_mut() = Some(e.payload.clone());
                Outcome::Continue
            })
            .unwrap();
        stage.load(loader, "missing.png").unwrap();
        stage.loader_fail(loader, "404").unwrap();

        assert_eq!(*seen.borrow(), Some(EventPayload::Error("404".into())));
        let info = stage.loader_info(loader).unwrap();
        assert_eq!(info.status(), LoadStatus::Failed);
        assert_eq!(info.error(), Some("404"));
    }

    #[test]
    fn unload_frees_content() {
        let mut stage = stage();
        let loader = stage.create_loader();
        stage.load(loader, "a.png").unwrap();
        stage
            .loader_complete(loader, BitmapData::new(1, 1, true, 0))
            .unwrap();
        let content = stage.loader_info(loader).unwrap().content().unwrap();
        stage.unload(loader).unwrap();
        assert!(!stage.is_alive(content));
        let info = stage.loader_info(loader).unwrap();
        assert_eq!(info.status(), LoadStatus::Idle);
        assert_eq!(info.content(), None);
        assert_eq!(info.url(), Some("a.png"));
    }

    #[test]
    fn loaded_content_stays_out_of_reach_of_the_container_api() {
        let mut stage = stage();
        let loader = stage.create_loader();
        stage.load(loader, "a.png").unwrap();
        stage
            .loader_complete(loader, BitmapData::new(2, 2, true, 0))
            .unwrap();
        let content = stage.loader_info(loader).unwrap().content().unwrap();
        let shape = stage.create_shape();

        assert_eq!(stage.add_child(loader, shape), Err(DisplayError::LoaderChild));
        assert_eq!(stage.add_child_at(loader, shape, 0), Err(DisplayError::LoaderChild));
        assert_eq!(stage.remove_child(loader, content), Err(DisplayError::LoaderChild));
        assert_eq!(stage.remove_child_at(loader, 0), Err(DisplayError::LoaderChild));
        assert_eq!(stage.children(loader), [content]);
        assert_eq!(stage.parent(shape), None);
    }

    #[test]
    fn non_loaders_are_rejected() {
        let mut stage = stage();
        let sprite = stage.create_sprite();
        assert_eq!(
            stage.load(sprite, "x"),
            Err(DisplayError::NotALoader(sprite))
        );
    }
}
