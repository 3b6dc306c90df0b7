/// Hosted analysis backend.
pub const DEFAULT_BACKEND_URL: &str =
    "https://backendfinguard-746989509626.asia-southeast2.run.app/analyze";

pub(super) fn default_log_level() -> String {
    "info".to_string()
}
pub(super) fn default_host() -> String {
    "127.0.0.1".to_string()
}
pub(super) fn default_port() -> u16 {
    8080
}
pub(super) fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}
pub(super) fn default_timeout_secs() -> u64 {
    60
}
pub(super) fn default_ocr_language() -> String {
    "eng".to_string()
}
pub(super) fn default_tesseract_path() -> String {
    "tesseract".to_string()
}
pub(super) fn default_ocr_endpoint() -> String {
    "https://api.ocr.space/parse/image".to_string()
}
pub(super) fn default_proxy_url() -> String {
    "http://127.0.0.1:8080/api/analyze".to_string()
}
