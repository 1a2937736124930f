use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::prelude::*;

use crate::assets::CardArt;
use crate::game::board::{BOARD_COLS, BOARD_ROWS, TILE_COUNT, row_col};
use crate::game::schedule::Scheduler;
use crate::game::table::{Presenter, Table, click_tile};

pub const TILE_GAP: u32 = 5;

pub struct BoardWidgets {
    pub grid: gtk::Grid,
    pub buttons: Vec<gtk::Button>,
    pub pictures: Vec<gtk::Picture>,
}

/// Lays out the 4x6 grid face-down. Clicks are wired separately once the
/// table exists.
pub fn build_board_grid(art: &CardArt) -> BoardWidgets {
    let grid = gtk::Grid::new();
    grid.add_css_class("memory-board");
    grid.set_row_spacing(TILE_GAP);
    grid.set_column_spacing(TILE_GAP);
    grid.set_row_homogeneous(true);
    grid.set_column_homogeneous(true);
    grid.set_halign(gtk::Align::Center);
    grid.set_valign(gtk::Align::Center);

    let mut buttons = Vec::with_capacity(TILE_COUNT);
    let mut pictures = Vec::with_capacity(TILE_COUNT);

    for position in 0..TILE_COUNT {
        let picture = gtk::Picture::new();
        picture.set_paintable(Some(art.back()));
        picture.set_can_shrink(false);
        picture.set_size_request(art.size(), art.size());

        let button = gtk::Button::builder()
            .css_classes(vec!["memory-card"])
            .child(&picture)
            .build();
        button.set_cursor_from_name(Some("pointer"));

        let (row, col) = row_col(position);
        grid.attach(&button, col as i32, row as i32, 1, 1);
        buttons.push(button);
        pictures.push(picture);
    }

    debug_assert_eq!(buttons.len(), BOARD_ROWS * BOARD_COLS);
    BoardWidgets {
        grid,
        buttons,
        pictures,
    }
}

pub fn connect_tile_clicks<P, S>(buttons: &[gtk::Button], table: &Rc<RefCell<Table<P, S>>>)
where
    P: Presenter + 'static,
    S: Scheduler + 'static,
{
    for (position, button) in buttons.iter().enumerate() {
        let table = table.clone();
        button.connect_clicked(move |_| {
            click_tile(&table, position);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::ui::app::{WINDOW_HEIGHT, WINDOW_WIDTH};

    fn grid_extent(card_size: i32) -> (i32, i32) {
        let gap = TILE_GAP as i32;
        let width = BOARD_COLS as i32 * card_size + (BOARD_COLS as i32 - 1) * gap;
        let height = BOARD_ROWS as i32 * card_size + (BOARD_ROWS as i32 - 1) * gap;
        (width, height)
    }

    #[test]
    fn tiles_are_five_pixels_apart() {
        assert_eq!(TILE_GAP, 5);
        assert_eq!(grid_extent(150), (925, 615));
    }

    #[test]
    fn default_board_fits_the_window() {
        let (width, height) = grid_extent(Settings::default().card_size);
        assert!(width < WINDOW_WIDTH);
        assert!(height < WINDOW_HEIGHT);
    }
}
