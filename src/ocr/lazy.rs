//! OCRプロバイダの遅延初期化
//!
//! エンジン構築（モデルロード相当）はコストが高いため、初回利用時に
//! 一度だけ行い、以降はハンドルを共有する。初期化に失敗した場合は
//! スロットを空のまま返すので、次のリクエストで再試行できる
//! （失敗が固定化しない）。

use crate::error::Result;
use crate::ocr::OcrProvider;
use std::sync::{Arc, Mutex};

type BuildFn = dyn Fn() -> Result<Arc<dyn OcrProvider>> + Send + Sync;

/// スレッドセーフな初期化1回きりのプロバイダハンドル
pub struct LazyOcr {
    slot: Mutex<Option<Arc<dyn OcrProvider>>>,
    build: Box<BuildFn>,
}

impl LazyOcr {
    pub fn new<F>(build: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn OcrProvider>> + Send + Sync + 'static,
    {
        Self {
            slot: Mutex::new(None),
            build: Box::new(build),
        }
    }

    /// 既に構築済みのプロバイダを包む（テスト・固定構成用）
    pub fn from_provider(provider: Arc<dyn OcrProvider>) -> Self {
        Self {
            slot: Mutex::new(Some(provider.clone())),
            build: Box::new(move || Ok(provider.clone())),
        }
    }

    /// プロバイダを取得する。未初期化なら構築を試みる
    pub fn get_or_init(&self) -> Result<Arc<dyn OcrProvider>> {
        let mut slot = self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(provider) = slot.as_ref() {
            return Ok(provider.clone());
        }

        // 失敗時はスロットを空のまま返す（次回再試行）
        let provider = (self.build)()?;
        *slot = Some(provider.clone());
        Ok(provider)
    }

    /// 初期化済みかどうか（ヘルスチェック用、初期化はしない）
    pub fn is_initialized(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StockOcrError;
    use crate::ocr::Fragment;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NopProvider;

    impl OcrProvider for NopProvider {
        fn recognize(&self, _image: &[u8]) -> Result<Vec<Fragment>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_initializes_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let count2 = count.clone();
        let lazy = LazyOcr::new(move || {
            count2.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(NopProvider) as Arc<dyn OcrProvider>)
        });

        assert!(!lazy.is_initialized());
        lazy.get_or_init().unwrap();
        lazy.get_or_init().unwrap();
        assert!(lazy.is_initialized());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_from_provider_starts_initialized() {
        let lazy = LazyOcr::from_provider(Arc::new(NopProvider));
        assert!(lazy.is_initialized());
        let provider = lazy.get_or_init().unwrap();
        assert!(provider.recognize(b"img").unwrap().is_empty());
    }

    #[test]
    fn test_failed_init_is_retryable() {
        let count = Arc::new(AtomicUsize::new(0));
        let count2 = count.clone();
        let lazy = LazyOcr::new(move || {
            let n = count2.fetch_add(1, Ordering::SeqCst);
            if n == 0 {
                Err(StockOcrError::Ocr("モデルロード失敗".into()))
            } else {
                Ok(Arc::new(NopProvider) as Arc<dyn OcrProvider>)
            }
        });

        assert!(lazy.get_or_init().is_err());
        assert!(!lazy.is_initialized());

        // 2回目は成功する
        assert!(lazy.get_or_init().is_ok());
        assert!(lazy.is_initialized());
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
