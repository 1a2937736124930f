use gettextrs::gettext;
use gtk4 as gtk;
use gtk4::prelude::*;

use crate::game::board::PAIR_COUNT;

fn pairs_text(pairs_found: u8) -> String {
    format!("{}: {}/{}", gettext("Pairs found"), pairs_found, PAIR_COUNT)
}

fn moves_text(moves: u32) -> String {
    format!("{}: {}", gettext("Moves"), moves)
}

/// The counters strip above the board.
#[derive(Clone)]
pub struct Hud {
    root: gtk::CenterBox,
    pairs_label: gtk::Label,
    moves_label: gtk::Label,
}

impl Hud {
    pub fn new() -> Self {
        let root = gtk::CenterBox::new();
        root.add_css_class("score-bar");

        let pairs_label = gtk::Label::builder()
            .label(pairs_text(0))
            .halign(gtk::Align::Start)
            .css_classes(vec!["score-label"])
            .build();
        let moves_label = gtk::Label::builder()
            .label(moves_text(0))
            .halign(gtk::Align::End)
            .css_classes(vec!["score-label"])
            .build();

        root.set_start_widget(Some(&pairs_label));
        root.set_end_widget(Some(&moves_label));

        Hud {
            root,
            pairs_label,
            moves_label,
        }
    }

    pub fn widget(&self) -> &gtk::CenterBox {
        &self.root
    }

    pub fn set_pairs(&self, pairs_found: u8) {
        self.pairs_label.set_text(&pairs_text(pairs_found));
    }

    pub fn set_moves(&self, moves: u32) {
        self.moves_label.set_text(&moves_text(moves));
    }
}

impl Default for Hud {
    fn default() -> Self {
        Self::new()
    }
}
