use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::chart::{self, ChartState};
use crate::gui::theme::{self, ThemeColors};
use circlechart_core::{ProgressSpec, RainbowSpec, Size};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

pub struct AppModel {
    pub state: Rc<RefCell<ChartState>>,
    pub theme: ThemeColors,
    pub view_size: i32,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    Progress(ProgressSpec),
    Rainbow(Option<RainbowSpec>),
    Debug(bool),
    ToggleDebug,
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Progress(p) => AppMsg::Progress(p),
            AppEvent::Rainbow(r) => AppMsg::Rainbow(r),
            AppEvent::Debug(on) => AppMsg::Debug(on),
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Config, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Circle Chart"),
            set_default_size: (model.view_size, model.view_size),
            add_css_class: "circlechart-window",

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::d {
                        sender.input(AppMsg::ToggleDebug);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                add_css_class: "circlechart-drawing-area",
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, rx) = init;

        theme::load_css();
        let theme = ThemeColors::from_context(&root.style_context());
        let state = Rc::new(RefCell::new(ChartState::from_config(&config, &theme)));

        let model = AppModel {
            state,
            theme,
            view_size: config.style.view_size.round().max(1.0) as i32,
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let state_draw = model.state.clone();
        widgets
            .drawing_area
            .set_draw_func(move |_, cr, width, height| {
                let size = Size::new(width as f64, height as f64);
                let commands = match state_draw.borrow_mut().frame(size, Instant::now()) {
                    Ok(commands) => commands,
                    Err(e) => {
                        log::error!("Render error: {}", e);
                        return;
                    }
                };
                if let Err(e) = chart::draw(cr, &commands) {
                    log::error!("Drawing error: {}", e);
                }
            });

        // keep repainting while any value is still moving
        let state_tick = model.state.clone();
        widgets.drawing_area.add_tick_callback(move |area, _| {
            if state_tick.borrow().is_animating(Instant::now()) {
                area.queue_draw();
            }
            glib::ControlFlow::Continue
        });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Progress(progress) => {
                log::debug!("Progress {} / {}", progress.current, progress.max);
                self.state.borrow_mut().set_progress(progress);
            }
            AppMsg::Rainbow(rainbow) => {
                log::debug!("Rainbow {:?}", rainbow);
                self.state.borrow_mut().set_rainbow(rainbow);
            }
            AppMsg::Debug(on) => self.state.borrow_mut().set_debug(on),
            AppMsg::ToggleDebug => {
                let on = self.state.borrow_mut().toggle_debug();
                log::info!("Debug overlay {}", if on { "on" } else { "off" });
            }
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    self.state
                        .borrow_mut()
                        .apply_config(&new_config, &self.theme);
                    log::info!("Configuration reloaded");
                }
                Err(e) => {
                    log::error!("Failed to reload config: {}", e);
                    return;
                }
            },
        }
        self.drawing_area.queue_draw();
    }
}
