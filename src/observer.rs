// observer.rs — 宿主通知 (纹理失败 / 内存不足 / 初始化完成)

use crate::error::ViewerError;
use std::sync::mpsc::Sender;

/// Host-side hooks. All methods default to doing nothing.
pub trait ViewerObserver {
    fn texture_load_failed(&mut self, _err: &ViewerError) {}

    fn memory_exhausted(&mut self) {}

    fn setup_complete(&mut self) {}
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    TextureLoadFailed(String),
    MemoryExhausted,
    SetupComplete,
}

/// Forwards notifications over a channel, e.g. to a UI thread.
pub struct ChannelObserver {
    tx: Sender<ViewerEvent>,
}

impl ChannelObserver {
    pub fn new(tx: Sender<ViewerEvent>) -> Self {
        Self { tx }
    }

    fn send(&self, event: ViewerEvent) {
        if self.tx.send(event).is_err() {
            log::debug!("viewer event dropped: receiver gone");
        }
    }
}

impl ViewerObserver for ChannelObserver {
    fn texture_load_failed(&mut self, err: &ViewerError) {
        self.send(ViewerEvent::TextureLoadFailed(err.to_string()));
    }

    fn memory_exhausted(&mut self) {
        self.send(ViewerEvent::MemoryExhausted);
    }

    fn setup_complete(&mut self) {
        self.send(ViewerEvent::SetupComplete);
    }
}

#[derive(Debug, Default)]
pub struct LogObserver;

impl ViewerObserver for LogObserver {
    fn texture_load_failed(&mut self, err: &ViewerError) {
        log::warn!("{err}");
    }

    fn memory_exhausted(&mut self) {
        log::warn!("{}", ViewerError::ResourceExhaustion);
    }

    fn setup_complete(&mut self) {
        log::info!("viewer setup complete");
    }
}

impl<T: ViewerObserver + ?Sized> ViewerObserver for Box<T> {
    fn texture_load_failed(&mut self, err: &ViewerError) {
        (**self).texture_load_failed(err)
    }

    fn memory_exhausted(&mut self) {
        (**self).memory_exhausted()
    }

    fn setup_complete(&mut self) {
        (**self).setup_complete()
    }
}
