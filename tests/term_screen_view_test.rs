use pocket_console::core::{Console, ConsoleConfig, MemoryScoreStore};
use pocket_console::term::{
    AnchorY, BezelStatus, FrameBuffer, Palette, ScreenView, Viewport, BEZEL_HEIGHT, BEZEL_WIDTH,
    SCREEN_COLS, SCREEN_ROWS,
};
use pocket_console::types::{Button, CartridgeKind, DrawList, PieceKind, Shade};

const TINT: u32 = 0x9B_BC0F;

fn status() -> BezelStatus {
    BezelStatus {
        powered: true,
        cartridge: Some(CartridgeKind::Tetris),
        volume: 5,
    }
}

fn all_text(fb: &FrameBuffer) -> String {
    (0..fb.height()).map(|y| fb.row_text(y) + "\n").collect()
}

#[test]
fn screen_view_centers_bezel_in_viewport() {
    let view = ScreenView::new(TINT);
    let vp = Viewport::new(BEZEL_WIDTH + 20, BEZEL_HEIGHT + 10);
    let fb = view.render(&DrawList::new(), &status(), vp);

    let (bx, by) = (10, 5);
    assert_eq!(fb.get(bx, by).unwrap().ch, '┌');
    assert_eq!(fb.get(bx + BEZEL_WIDTH - 1, by + BEZEL_HEIGHT - 1).unwrap().ch, '┘');
    assert!(all_text(&fb).contains("[TETRIS]"));
}

#[test]
fn screen_view_draws_blocks_two_chars_wide() {
    let view = ScreenView::new(TINT).with_anchor_y(AnchorY::Top);
    let vp = Viewport::new(BEZEL_WIDTH, BEZEL_HEIGHT);
    let mut list = DrawList::new();
    list.block(0, 19, PieceKind::I, false);
    list.block(9, 0, PieceKind::T, true);

    let fb = view.render(&list, &status(), vp);
    let (sx, sy) = view.screen_origin(vp);

    assert_eq!(fb.get(sx + 2, sy + 19).unwrap().ch, '█');
    assert_eq!(fb.get(sx + 3, sy + 19).unwrap().ch, '█');
    assert_eq!(fb.get(sx + 20, sy).unwrap().ch, '░');
    assert_eq!(fb.get(sx + 21, sy).unwrap().ch, '░');
}

#[test]
fn screen_view_maps_shades_through_tint() {
    let view = ScreenView::new(TINT).with_anchor_y(AnchorY::Top);
    let vp = Viewport::new(BEZEL_WIDTH, BEZEL_HEIGHT);
    let mut list = DrawList::new();
    list.fill(Shade::Darkest);
    list.text(0, 0, "HI", Shade::Lightest);

    let fb = view.render(&list, &status(), vp);
    let (sx, sy) = view.screen_origin(vp);
    let palette = Palette::from_tint(TINT);

    let corner = fb.get(sx + SCREEN_COLS - 1, sy + SCREEN_ROWS - 1).unwrap();
    assert_eq!(corner.style.bg, palette.shade(Shade::Darkest));

    let h = fb.get(sx, sy).unwrap();
    assert_eq!(h.ch, 'H');
    assert_eq!(h.style.fg, palette.shade(Shade::Lightest));
    // Text keeps the background underneath it.
    assert_eq!(h.style.bg, palette.shade(Shade::Darkest));
}

#[test]
fn screen_view_applies_fade_opacity() {
    let view = ScreenView::new(TINT).with_anchor_y(AnchorY::Top);
    let vp = Viewport::new(BEZEL_WIDTH, BEZEL_HEIGHT);
    let mut list = DrawList::new();
    list.fill(Shade::Lightest);
    list.set_opacity(0);

    let fb = view.render(&list, &status(), vp);
    let (sx, sy) = view.screen_origin(vp);
    let cell = fb.get(sx + 5, sy + 5).unwrap();
    assert_eq!((cell.style.bg.r, cell.style.bg.g, cell.style.bg.b), (0, 0, 0));
}

#[test]
fn screen_view_renders_running_tetris() {
    let mut console = Console::new(ConsoleConfig::default(), Box::new(MemoryScoreStore::new()));
    for _ in 0..400 {
        console.update(16);
    }
    console.on_button_press(Button::Start);

    let mut list = DrawList::new();
    console.render(&mut list);
    let view = ScreenView::new(console.config().tint);
    let fb = view.render(
        &list,
        &BezelStatus::from_console(&console),
        Viewport::new(80, 40),
    );

    let text = all_text(&fb);
    assert!(text.contains("SCORE"));
    assert!(text.contains('█'));
}

#[test]
fn screen_view_clips_to_small_viewports() {
    let view = ScreenView::new(TINT);
    let mut list = DrawList::new();
    list.text(0, 0, "SCORE", Shade::Darkest);
    let fb = view.render(&list, &status(), Viewport::new(10, 4));
    assert_eq!(fb.width(), 10);
    assert_eq!(fb.height(), 4);
}
