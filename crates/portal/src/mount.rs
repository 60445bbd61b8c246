use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Lifetime of a mounted page.
///
/// In-flight fetches are raced against the scope; once the page unmounts
/// their results are dropped instead of written into page state.
#[derive(Debug, Clone, Default)]
pub struct MountScope {
    token: CancellationToken,
}

impl MountScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scope that ends with this one but can also be ended on its own.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    pub fn unmount(&self) {
        self.token.cancel();
    }

    pub fn is_mounted(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Drive `fut` to completion unless the scope ends first.
    ///
    /// Returns `None` when the page was unmounted before or during the call.
    pub async fn run<F>(&self, fut: F) -> Option<F::Output>
    where
        F: Future,
    {
        if !self.is_mounted() {
            return None;
        }
        tokio::select! {
            biased;
            _ = self.token.cancelled() => None,
            output = fut => self.is_mounted().then_some(output),
        }
    }
}
