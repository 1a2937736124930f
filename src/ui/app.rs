use std::cell::{Cell, RefCell};
use std::rc::Rc;

use adw::prelude::*;
use gettextrs::gettext;
use gio::SimpleAction;
use gtk4 as gtk;
use gtk4::glib;
use gtk4::prelude::*;
use libadwaita as adw;
use tracing::{error, info};

use super::board::{build_board_grid, connect_tile_clicks};
use super::dialogs::{show_about_dialog, show_fatal_error};
use super::hud::Hud;
use super::presenter::GtkPresenter;
use super::timer::GlibScheduler;
use crate::assets::{AssetManifest, CardArt};
use crate::audio::SoundBoard;
use crate::config::Settings;
use crate::error::StartupError;
use crate::game::session::GameSession;
use crate::game::table::{Table, request_reset};

pub const APP_ID: &str = "io.github.concentration";

pub(crate) const WINDOW_WIDTH: i32 = 1200;
pub(crate) const WINDOW_HEIGHT: i32 = 950;

type GameTable = Table<GtkPresenter, GlibScheduler>;

pub fn run(settings: Settings) -> glib::ExitCode {
    glib::set_prgname(Some(APP_ID));
    let app = adw::Application::builder().application_id(APP_ID).build();
    let startup_failed = Rc::new(Cell::new(false));

    app.connect_activate({
        let startup_failed = startup_failed.clone();
        move |app| {
            if let Some(window) = app.active_window() {
                window.present();
                return;
            }

            load_css();
            if let Err(err) = build_game(app, &settings) {
                error!(%err, "cannot start");
                startup_failed.set(true);
                show_fatal_error(app, &err.to_string());
            }
        }
    });

    let code = app.run();
    exit_code(code, startup_failed.get())
}

/// A failed startup still runs the main loop for the error dialog, so the
/// loop's own exit code has to be overridden.
fn exit_code(code: glib::ExitCode, startup_failed: bool) -> glib::ExitCode {
    if startup_failed {
        glib::ExitCode::FAILURE
    } else {
        code
    }
}

fn build_game(app: &adw::Application, settings: &Settings) -> Result<(), StartupError> {
    let manifest = AssetManifest::discover(&settings.image_dir, &settings.back_image)?;
    let art = CardArt::load(&manifest, settings.card_size, settings.corner_radius)?;
    let sounds = SoundBoard::open(&settings.sound_dir, settings.sound_enabled);

    let hud = Hud::new();
    let board = build_board_grid(&art);

    let reset_button = gtk::Button::builder()
        .label(gettext("Reset Game"))
        .halign(gtk::Align::Center)
        .css_classes(vec!["reset-button"])
        .build();
    reset_button.set_cursor_from_name(Some("pointer"));

    let content = gtk::Box::new(gtk::Orientation::Vertical, 0);
    content.add_css_class("game-root");
    content.append(hud.widget());
    content.append(&reset_button);
    content.append(&board.grid);

    let restart_button = gtk::Button::builder()
        .icon_name("view-refresh-symbolic")
        .build();
    restart_button.set_tooltip_text(Some(gettext("New Game").as_str()));

    let menu_model = gio::Menu::new();
    menu_model.append(Some(gettext("New Game").as_str()), Some("app.new-game"));
    menu_model.append(Some(gettext("About Memory Match").as_str()), Some("app.about"));
    menu_model.append(Some(gettext("Quit").as_str()), Some("app.quit"));
    let menu_button = gtk::MenuButton::builder()
        .icon_name("open-menu-symbolic")
        .menu_model(&menu_model)
        .build();

    let header = adw::HeaderBar::new();
    header.add_css_class("app-header");
    header.add_css_class("flat");
    header.pack_start(&restart_button);
    header.pack_end(&menu_button);

    let toolbar = adw::ToolbarView::new();
    toolbar.add_top_bar(&header);
    toolbar.set_content(Some(&content));

    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title(gettext("Memory Match"))
        .default_width(WINDOW_WIDTH)
        .default_height(WINDOW_HEIGHT)
        .resizable(false)
        .content(&toolbar)
        .build();
    window.add_css_class("app-window");

    let presenter = GtkPresenter::new(
        window.clone(),
        board.buttons.clone(),
        board.pictures,
        art,
        hud,
        sounds,
    );
    let table = Table::new(
        GameSession::new(),
        presenter,
        GlibScheduler,
        settings.reveal_delay(),
    )
    .into_shared();

    let weak_table = Rc::downgrade(&table);
    table
        .borrow_mut()
        .presenter_mut()
        .set_play_again(Rc::new(move || {
            if let Some(table) = weak_table.upgrade() {
                request_reset(&table);
            }
        }));

    connect_tile_clicks(&board.buttons, &table);
    for button in [&reset_button, &restart_button] {
        let table = table.clone();
        button.connect_clicked(move |_| {
            request_reset(&table);
        });
    }

    install_actions(app, &table);

    info!(
        delay_ms = settings.reveal_delay_ms,
        sound = settings.sound_enabled,
        "game ready"
    );
    window.present();
    Ok(())
}

fn install_actions(app: &adw::Application, table: &Rc<RefCell<GameTable>>) {
    let new_game_action = SimpleAction::new("new-game", None);
    new_game_action.connect_activate({
        let table = table.clone();
        move |_, _| {
            request_reset(&table);
        }
    });
    app.add_action(&new_game_action);

    let about_action = SimpleAction::new("about", None);
    about_action.connect_activate({
        let app = app.clone();
        move |_, _| {
            show_about_dialog(&app);
        }
    });
    app.add_action(&about_action);

    let quit_action = SimpleAction::new("quit", None);
    quit_action.connect_activate({
        let app = app.clone();
        move |_, _| app.quit()
    });
    app.add_action(&quit_action);

    app.set_accels_for_action("app.new-game", &["<Control>n"]);
    app.set_accels_for_action("app.quit", &["<Control>q"]);
}

fn load_css() {
    let Some(display) = gtk::gdk::Display::default() else {
        return;
    };

    let provider = gtk::CssProvider::new();
    provider.load_from_data(include_str!("../../data/style.css"));
    gtk::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_startup_exits_with_failure() {
        assert_eq!(
            exit_code(glib::ExitCode::SUCCESS, true),
            glib::ExitCode::FAILURE
        );
    }

    #[test]
    fn normal_run_keeps_the_loop_exit_code() {
        assert_eq!(
            exit_code(glib::ExitCode::SUCCESS, false),
            glib::ExitCode::SUCCESS
        );
    }
}
