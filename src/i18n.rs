use gettextrs::{LocaleCategory, bindtextdomain, setlocale, textdomain};
use tracing::warn;

pub const GETTEXT_PACKAGE: &str = "concentration";
const LOCALE_DIR: &str = "/usr/share/locale";

/// Untranslated English is used whenever any step here fails.
pub fn init() {
    setlocale(LocaleCategory::LcAll, "");
    if let Err(err) = bindtextdomain(GETTEXT_PACKAGE, LOCALE_DIR) {
        warn!(%err, "could not bind translations");
        return;
    }
    if let Err(err) = textdomain(GETTEXT_PACKAGE) {
        warn!(%err, "could not select translation domain");
    }
}
