use concentration::config::Settings;
use concentration::{i18n, logging, ui};
use gtk4::glib;

fn main() -> glib::ExitCode {
    logging::init();
    i18n::init();
    let settings = Settings::load();
    ui::app::run(settings)
}
