//! Fire-and-forget toast notifications.

use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Visual style of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ToastVariant {
    /// Neutral or success message.
    #[default]
    Default,
    /// Error or "try again" message.
    Destructive,
}

/// A short message shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct Toast {
    /// Bold first line.
    pub title: String,
    /// Body text.
    pub description: String,
    /// Styling.
    #[new(default)]
    pub variant: ToastVariant,
}

impl Toast {
    /// Creates a destructive toast.
    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: ToastVariant::Destructive,
        }
    }

    /// True for the destructive variant.
    pub fn is_destructive(&self) -> bool {
        self.variant == ToastVariant::Destructive
    }

    // Fixed copy, one constructor per message.

    pub(crate) fn letters_complete() -> Self {
        Self::new("Tamamlandı! 😍".into(), "Seni Seviyorum!".into())
    }

    pub(crate) fn guess_correct() -> Self {
        Self::new("Doğru tahmin! 😍".into(), "Biliyordum ki beni seviyorsun!".into())
    }

    pub(crate) fn guess_wrong() -> Self {
        Self::destructive("Tekrar dene! 💭", "Harf alarak ipucu edinebilirsin...")
    }

    pub(crate) fn camera_ready() -> Self {
        Self::new(
            "Kamera hazır".into(),
            "Görüntü gelmiyorsa yeniden başlatmayı deneyin.".into(),
        )
    }

    pub(crate) fn camera_failed() -> Self {
        Self::destructive(
            "Kamera erişimi başarısız",
            "İzinleri kontrol edin veya Yedek: Fotoğraf Yükle seçeneğini kullanın.",
        )
    }

    pub(crate) fn capture_failed() -> Self {
        Self::destructive(
            "Fotoğraf çekilemedi",
            "Kamerayı yeniden başlatın veya Yedek: Fotoğraf Yükle seçeneğini kullanın.",
        )
    }

    pub(crate) fn upload_rejected() -> Self {
        Self::destructive("Dosya okunamadı", "Lütfen bir resim dosyası seçin.")
    }

    pub(crate) fn accepted(recipient: &str) -> Self {
        Self::new("🎉 Yaşasın!".into(), format!("Seni çok seviyorum {recipient}! ❤️"))
    }

    pub(crate) fn declined() -> Self {
        Self::destructive("Hayırr! 😅", "Yanlış butona tıkladınız, yeniden deneyin.")
    }
}

/// Surface that displays toasts.
pub trait Notifier {
    /// Shows a toast. No return value, no persistence.
    fn notify(&mut self, toast: Toast);
}

/// Notifier that keeps every toast in memory.
#[derive(Debug, Clone, Default)]
pub struct ToastLog {
    toasts: Vec<Toast>,
}

impl ToastLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// All toasts in arrival order.
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Most recent toast.
    pub fn last(&self) -> Option<&Toast> {
        self.toasts.last()
    }

    /// Number of destructive toasts seen.
    pub fn destructive_count(&self) -> usize {
        self.toasts.iter().filter(|t| t.is_destructive()).count()
    }

    /// Removes and returns everything logged so far.
    pub fn drain(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }
}

impl Notifier for ToastLog {
    #[instrument(skip(self), fields(title = %toast.title))]
    fn notify(&mut self, toast: Toast) {
        debug!(variant = ?toast.variant, "Toast");
        self.toasts.push(toast);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_counts_destructive() {
        let mut log = ToastLog::new();
        log.notify(Toast::guess_correct());
        log.notify(Toast::guess_wrong());
        log.notify(Toast::camera_failed());

        assert_eq!(log.toasts().len(), 3);
        assert_eq!(log.destructive_count(), 2);
        assert_eq!(log.drain().len(), 3);
        assert!(log.toasts().is_empty());
    }

    #[test]
    fn test_accepted_names_recipient() {
        let toast = Toast::accepted("Yağmur");
        assert_eq!(toast.description, "Seni çok seviyorum Yağmur! ❤️");
        assert!(!toast.is_destructive());
    }
}
