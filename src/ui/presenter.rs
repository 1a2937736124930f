use std::rc::Rc;

use gtk4 as gtk;
use gtk4::prelude::*;
use libadwaita as adw;
use tracing::info;

use crate::assets::CardArt;
use crate::audio::{SoundBoard, SoundCue};
use crate::game::events::GameEvent;
use crate::game::table::Presenter;

use super::dialogs::show_win_dialog;
use super::hud::Hud;

/// Turns game events into widget updates and sound cues.
pub struct GtkPresenter {
    window: adw::ApplicationWindow,
    buttons: Vec<gtk::Button>,
    pictures: Vec<gtk::Picture>,
    art: CardArt,
    hud: Hud,
    sounds: SoundBoard,
    on_play_again: Option<Rc<dyn Fn()>>,
}

impl GtkPresenter {
    pub fn new(
        window: adw::ApplicationWindow,
        buttons: Vec<gtk::Button>,
        pictures: Vec<gtk::Picture>,
        art: CardArt,
        hud: Hud,
        sounds: SoundBoard,
    ) -> Self {
        GtkPresenter {
            window,
            buttons,
            pictures,
            art,
            hud,
            sounds,
            on_play_again: None,
        }
    }

    pub fn set_play_again(&mut self, handler: Rc<dyn Fn()>) {
        self.on_play_again = Some(handler);
    }

    fn show_face(&self, position: usize, texture: &gtk::gdk::Texture) {
        if let Some(picture) = self.pictures.get(position) {
            picture.set_paintable(Some(texture));
        }
    }
}

impl Presenter for GtkPresenter {
    fn present(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::TileRevealed { position, value } => {
                self.show_face(position, self.art.face(value));
                if let Some(button) = self.buttons.get(position) {
                    button.add_css_class("revealed");
                }
                self.sounds.play(SoundCue::Click);
            }
            GameEvent::TileHidden { position } => {
                self.show_face(position, self.art.back());
                if let Some(button) = self.buttons.get(position) {
                    button.remove_css_class("revealed");
                    button.remove_css_class("matched");
                }
            }
            GameEvent::PairResolved {
                first,
                second,
                matched,
            } => {
                if matched {
                    for position in [first, second] {
                        if let Some(button) = self.buttons.get(position) {
                            button.remove_css_class("revealed");
                            button.add_css_class("matched");
                        }
                    }
                    self.sounds.play(SoundCue::Match);
                } else {
                    self.sounds.play(SoundCue::Wrong);
                }
            }
            GameEvent::PairsCountChanged(pairs_found) => self.hud.set_pairs(pairs_found),
            GameEvent::MovesCountChanged(moves) => self.hud.set_moves(moves),
            GameEvent::GameWon { pairs_found, moves } => {
                info!(pairs_found, moves, "game won");
                self.sounds.play(SoundCue::Win);
                show_win_dialog(&self.window, pairs_found, moves, self.on_play_again.clone());
            }
        }
    }
}
