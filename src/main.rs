//! Moving TMU entry point
//!
//! On the web this wires the check-in view: geolocation watch, push button,
//! ID card (copy, rename, recover) and rank readout. Natively it runs the
//! reference scenario and prints the results.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use futures::future::{AbortHandle, abortable};
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlButtonElement, HtmlInputElement};

    use moving_tmu::consts::VIEW_REFRESH_MS;
    use moving_tmu::impact::Impact;
    use moving_tmu::operation::{self, CheckInDesk, GeoFix, GeolocationUnavailable, PushError};
    use moving_tmu::persistence::LocalStorage;
    use moving_tmu::platform::{self, GeoWatch};
    use moving_tmu::profile::ProfileManager;
    use moving_tmu::random::SeededRandom;
    use moving_tmu::settings::Settings;

    type Profiles = ProfileManager<LocalStorage, SeededRandom>;

    /// Check-in view state
    struct App {
        desk: Rc<RefCell<CheckInDesk>>,
        profiles: Rc<RefCell<Profiles>>,
        /// Dropping this stops location sensing
        watch: Option<GeoWatch>,
        /// Cancels the pending push, if any
        pending_push: Option<AbortHandle>,
        /// `setInterval` handle for the periodic view refresh
        refresh_timer: Option<i32>,
    }

    fn document() -> Option<web_sys::Document> {
        web_sys::window()?.document()
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    fn input_value(id: &str) -> Option<String> {
        let el = document()?.get_element_by_id(id)?;
        let input: HtmlInputElement = el.dyn_into().ok()?;
        Some(input.value())
    }

    fn clear_input(id: &str) {
        if let Some(input) = document()
            .and_then(|d| d.get_element_by_id(id))
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_value("");
        }
    }

    impl App {
        /// Refresh status line, ID card and rank readout
        fn update_view(&self) {
            let now = platform::now_ms();
            let desk = self.desk.borrow();

            set_text("status", &desk.status(now).to_string());

            let in_range = desk
                .proximity(now)
                .map(|r| r.within_radius)
                .unwrap_or(false);
            if let Some(btn) = document()
                .and_then(|d| d.get_element_by_id("push-btn"))
                .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
            {
                btn.set_disabled(!in_range || desk.is_push_in_flight());
            }

            let profiles = self.profiles.borrow();
            let profile = profiles.profile();
            let progression = profile.progression();
            let impact = Impact::from_pushes(profile.total_actions);

            set_text("profile-id", &profile.id);
            set_text("profile-codename", &profile.codename);
            set_text("total-pushes", &profile.total_actions.to_string());
            set_text("rank-title", progression.rank.title);
            set_text(
                "rank-progress",
                &format!("{:.0}%", progression.progress_percent),
            );
            match progression.next_rank {
                Some(next) => set_text(
                    "next-rank",
                    &format!("{} / {} REQ", profile.total_actions, next.threshold),
                ),
                None => set_text("next-rank", "MAX RANK"),
            }
            set_text(
                "personal-distance",
                &format!("{:.2} mm", impact.distance_millimeters()),
            );
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Moving TMU starting...");

        let settings = Settings::default();
        let desk = CheckInDesk::new(settings.clone()).expect("no check-in locations configured");
        let storage = LocalStorage::open().expect("localStorage unavailable");
        let (profiles, problem) = ProfileManager::open(storage, SeededRandom::from_clock());
        if let Some(e) = problem {
            log::warn!("Profile not saved, progress will not persist: {e}");
        }

        let app = Rc::new(RefCell::new(App {
            desk: Rc::new(RefCell::new(desk)),
            profiles: Rc::new(RefCell::new(profiles)),
            watch: None,
            pending_push: None,
            refresh_timer: None,
        }));

        start_watch(&app, &settings);
        setup_push_button(app.clone(), settings.push_delay_ms);
        setup_id_card(app.clone());
        setup_refresh(app.clone());
        setup_teardown(app.clone());

        app.borrow().update_view();
        log::info!("Moving TMU running!");
    }

    fn start_watch(app: &Rc<RefCell<App>>, settings: &Settings) {
        let on_fix = {
            let app = app.clone();
            move |fix: GeoFix| {
                let a = app.borrow();
                a.desk.borrow_mut().update_fix(fix);
                a.update_view();
            }
        };
        let on_error = {
            let app = app.clone();
            move |error: GeolocationUnavailable| {
                let a = app.borrow();
                a.desk.borrow_mut().report_error(error);
                a.update_view();
            }
        };

        match GeoWatch::start(&settings.watch, on_fix, on_error) {
            Ok(watch) => app.borrow_mut().watch = Some(watch),
            Err(error) => {
                let a = app.borrow();
                a.desk.borrow_mut().report_error(error);
                a.update_view();
            }
        }
    }

    fn setup_push_button(app: Rc<RefCell<App>>, delay_ms: u32) {
        let Some(btn) = document().and_then(|d| d.get_element_by_id("push-btn")) else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            // One gesture, one push; the desk guard only engages once the task runs
            if app.borrow().pending_push.is_some() {
                return;
            }
            let (desk, profiles) = {
                let a = app.borrow();
                (a.desk.clone(), a.profiles.clone())
            };
            let now = platform::now_ms();
            let (task, handle) = abortable(async move {
                operation::push(&*desk, &*profiles, now, platform::sleep_ms(delay_ms)).await
            });
            app.borrow_mut().pending_push = Some(handle);
            app.borrow().update_view();

            let app = app.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match task.await {
                    Ok(Ok(total)) => log::info!("Thrust delivered ({total} total)"),
                    Ok(Err(PushError::OutOfRange { nearest, distance_meters })) => {
                        log::warn!("Out of range: {nearest} is {distance_meters:.0}m away");
                    }
                    Ok(Err(e)) => log::warn!("Push failed: {e}"),
                    Err(_) => log::info!("Push cancelled"),
                }
                app.borrow_mut().pending_push = None;
                app.borrow().update_view();
            });
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_id_card(app: Rc<RefCell<App>>) {
        let Some(document) = document() else {
            return;
        };

        // Copy ID
        if let Some(btn) = document.get_element_by_id("copy-id-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let a = app.borrow();
                let id = a.profiles.borrow().profile().id.clone();
                platform::copy_to_clipboard(&id);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Rename
        if let Some(btn) = document.get_element_by_id("rename-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let Some(name) = input_value("rename-input") else {
                    return;
                };
                let a = app.borrow();
                if let Err(e) = a.profiles.borrow_mut().rename(&name) {
                    log::warn!("Rename not saved: {e}");
                }
                a.update_view();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Recover an existing ID (local reset)
        if let Some(btn) = document.get_element_by_id("load-id-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let Some(id) = input_value("load-id-input") else {
                    return;
                };
                let a = app.borrow();
                let result = a.profiles.borrow_mut().replace_identity(&id).map(|_| ());
                match result {
                    Ok(()) => clear_input("load-id-input"),
                    Err(e) => log::warn!("{e}"),
                }
                a.update_view();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Re-render on a timer so a lock drops once its fix goes stale
    fn setup_refresh(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let tick = {
            let app = app.clone();
            Closure::<dyn FnMut()>::new(move || {
                if let Ok(a) = app.try_borrow() {
                    a.update_view();
                }
            })
        };
        match window.set_interval_with_callback_and_timeout_and_arguments_0(
            tick.as_ref().unchecked_ref(),
            VIEW_REFRESH_MS,
        ) {
            Ok(handle) => app.borrow_mut().refresh_timer = Some(handle),
            Err(e) => log::warn!("View refresh timer not started: {e:?}"),
        }
        tick.forget();
    }

    /// Stop sensing and cancel any pending push when the page goes away
    fn setup_teardown(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut a = app.borrow_mut();
            if let Some(handle) = a.pending_push.take() {
                handle.abort();
            }
            a.watch = None;
            if let (Some(handle), Some(window)) = (a.refresh_timer.take(), web_sys::window()) {
                window.clear_interval_with_handle(handle);
            }
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Moving TMU (native) starting...");
    log::info!("Native mode has no location sensor - serve the web build for check-ins");

    if let Err(e) = run_reference_scenario() {
        log::error!("Reference scenario failed: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Walk the reference deployment: check in at Hino, push, then wander off
#[cfg(not(target_arch = "wasm32"))]
fn run_reference_scenario() -> Result<(), Box<dyn std::error::Error>> {
    use std::cell::RefCell;

    use moving_tmu::impact::{CampaignStatus, Impact};
    use moving_tmu::operation::{self, CheckInDesk, GeoFix};
    use moving_tmu::persistence::MemoryStorage;
    use moving_tmu::platform::now_ms;
    use moving_tmu::profile::ProfileManager;
    use moving_tmu::random::SeededRandom;
    use moving_tmu::settings::Settings;

    let settings = Settings::default();
    let hino = settings
        .location("日野")
        .ok_or("reference deployment has no Hino campus")?
        .coordinate();

    let desk = RefCell::new(CheckInDesk::new(settings)?);
    let (profiles, problem) = ProfileManager::open(MemoryStorage::new(), SeededRandom::from_clock());
    if let Some(e) = problem {
        return Err(e.into());
    }
    let profiles = RefCell::new(profiles);

    {
        let p = profiles.borrow();
        println!("Operative {} ({})", p.profile().id, p.profile().codename);
    }

    let now = now_ms();
    desk.borrow_mut().update_fix(GeoFix {
        coordinate: hino,
        timestamp_ms: now,
    });
    println!("{}", desk.borrow().status(now));

    for _ in 0..12 {
        futures::executor::block_on(operation::push(
            &desk,
            &profiles,
            now,
            futures::future::ready(()),
        ))?;
    }

    let far = hino.offset_meters(0.0, -5000.0);
    desk.borrow_mut().update_fix(GeoFix {
        coordinate: far,
        timestamp_ms: now,
    });
    println!("{}", desk.borrow().status(now));

    let profiles = profiles.borrow();
    let progression = profiles.progression();
    let impact = Impact::from_pushes(profiles.profile().total_actions);
    let campaign = CampaignStatus::with_personal(profiles.profile().total_actions);

    println!(
        "Rank: {} ({:.0}% to next)",
        progression.rank.title, progression.progress_percent
    );
    for medal in &progression.unlocked {
        println!("Medal: {} - {}", medal.title, medal.description);
    }
    println!(
        "Force {:.1} kN, distance {:.3} mm, {:.1} kcal",
        impact.force_kilonewtons(),
        impact.distance_millimeters(),
        impact.calories_kcal
    );
    println!(
        "Campaign: {} pushes, {:.6}% of the way to Marunouchi",
        campaign.global_pushes, campaign.progress_percent
    );
    Ok(())
}
