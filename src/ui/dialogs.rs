use std::cell::RefCell;
use std::rc::Rc;

use adw::prelude::*;
use gettextrs::gettext;
use gtk4 as gtk;
use libadwaita as adw;

pub fn show_win_dialog(
    parent: &impl IsA<gtk::Widget>,
    pairs_found: u8,
    moves: u32,
    on_play_again: Option<Rc<dyn Fn()>>,
) -> adw::AlertDialog {
    let body = format!(
        "{}\n\n{}: {}\n{}: {}\n\n{}",
        gettext("Congratulations, you won!"),
        gettext("Pairs found"),
        pairs_found,
        gettext("Moves used"),
        moves,
        gettext("Play another round?"),
    );
    let dialog = adw::AlertDialog::new(Some(gettext("You Win!").as_str()), Some(body.as_str()));
    dialog.add_response("close", &gettext("Close"));
    dialog.add_response("again", &gettext("Play Again"));
    dialog.set_response_appearance("again", adw::ResponseAppearance::Suggested);
    dialog.set_default_response(Some("again"));
    dialog.set_close_response("close");
    dialog.connect_response(None, move |_, response| {
        if response == "again"
            && let Some(play_again) = &on_play_again
        {
            play_again();
        }
    });
    dialog.present(Some(parent));
    dialog
}

/// Reports a startup failure and quits the application once dismissed.
pub fn show_fatal_error(app: &adw::Application, message: &str) -> adw::AlertDialog {
    let hold = RefCell::new(Some(app.hold()));
    let dialog = adw::AlertDialog::new(Some(gettext("Error").as_str()), Some(message));
    dialog.add_response("quit", &gettext("Quit"));
    dialog.set_default_response(Some("quit"));
    dialog.set_close_response("quit");
    dialog.connect_response(None, {
        let app = app.clone();
        move |_, _| {
            hold.borrow_mut().take();
            app.quit();
        }
    });
    dialog.present(app.active_window().as_ref());
    dialog
}

pub fn show_about_dialog(app: &adw::Application) -> adw::AboutDialog {
    let dialog = adw::AboutDialog::builder()
        .application_name(gettext("Memory Match"))
        .application_icon("io.github.concentration")
        .version(env!("CARGO_PKG_VERSION"))
        .comments(gettext("Flip two cards at a time and find all twelve pairs."))
        .build();
    dialog.add_legal_section("Memory Match", None, gtk::License::MitX11, None);
    dialog.present(app.active_window().as_ref());
    dialog
}
