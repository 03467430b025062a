use studymate_core::overlay::{CountingSurface, OverlayController, Transition};

const DIALOGS: [&str; 4] = ["auth", "notes", "note-form", "chat"];

/// Small deterministic generator so the sequences are reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }
}

#[test]
fn backdrop_exists_iff_a_dialog_is_open() {
    for seed in 0..200 {
        let mut rng = Lcg(seed);
        let mut overlay = OverlayController::new(CountingSurface::default());
        overlay.set_static("auth", true);

        for _ in 0..60 {
            let id = DIALOGS[(rng.next() % DIALOGS.len() as u64) as usize].to_string();
            match rng.next() % 7 {
                0 | 1 => {
                    overlay.apply(Transition::Opened(id));
                }
                2 => {
                    overlay.apply(Transition::CloseRequested(id));
                }
                3 => {
                    overlay.apply(Transition::Closed(id));
                }
                4 => {
                    overlay.escape();
                }
                5 => {
                    overlay.apply(Transition::Removed(id));
                }
                _ => {
                    overlay.backdrop_click(&id);
                }
            }

            let surface = overlay.surface();
            let open = overlay.open_count();
            assert!(surface.backdrops <= 1, "seed {seed}: duplicate backdrops");
            assert_eq!(
                surface.backdrops == 1,
                open > 0,
                "seed {seed}: backdrop out of sync with {open} open dialogs"
            );
            assert_eq!(surface.body_locked, open > 0, "seed {seed}: body lock");
        }
    }
}

#[test]
fn static_dialog_only_closes_explicitly() {
    let mut overlay = OverlayController::new(CountingSurface::default());
    overlay.set_static("auth", true);
    overlay.apply(Transition::Opened("auth".to_string()));

    for _ in 0..3 {
        overlay.backdrop_click("auth");
    }
    assert!(overlay.is_open("auth"));
    assert_eq!(overlay.surface().backdrops, 1);

    overlay.apply(Transition::CloseRequested("auth".to_string()));
    overlay.apply(Transition::Closed("auth".to_string()));
    assert_eq!(overlay.open_count(), 0);
    assert_eq!(overlay.surface().backdrops, 0);
}

#[test]
fn unmounting_an_open_panel_does_not_leak_the_backdrop() {
    let mut overlay = OverlayController::new(CountingSurface::default());
    overlay.set_static("auth", true);

    // Logout tears down the panels while one is still showing.
    overlay.apply(Transition::Opened("notes".to_string()));
    overlay.apply(Transition::Removed("notes".to_string()));
    assert_eq!(overlay.open_count(), 0);

    overlay.apply(Transition::Opened("auth".to_string()));
    overlay.apply(Transition::CloseRequested("auth".to_string()));
    overlay.apply(Transition::Closed("auth".to_string()));

    assert_eq!(overlay.open_count(), 0);
    assert_eq!(overlay.surface().backdrops, 0);
    assert!(!overlay.surface().body_locked);
}

#[test]
fn late_animation_end_never_drops_an_open_dialog() {
    let mut overlay = OverlayController::new(CountingSurface::default());
    overlay.apply(Transition::Opened("chat".to_string()));
    overlay.apply(Transition::Closed("chat".to_string()));

    assert!(overlay.is_open("chat"));
    assert_eq!(overlay.surface().backdrops, 1);
}
