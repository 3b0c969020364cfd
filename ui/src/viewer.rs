use anyhow::Result;
use geom::{Circle, Distance, PolyLine, Pt2D};
use widgetry::mapspace::{ObjectID, World};
use widgetry::tools::{open_browser, PopupMsg};
use widgetry::{
    Color, EventCtx, GfxCtx, HorizontalAlignment, Line, Outcome, Panel, State, TextBox, TextExt,
    UpdateType, VerticalAlignment, Widget,
};

use model::{Animator, CanonicalTimestamp, FlightSearch, FlowSeries, Waypoint};

use crate::components::{date_time, describe, FileLoader, SourceLoader};
use crate::source::Source;
use crate::{App, Transition};

const TRACK_COLOR: Color = Color::BLUE;
const MARKER_COLOR: Color = Color::RED;

pub struct Viewer {
    panel: Panel,
    // The auxiliary document for the last flow found, and the panel describing it
    document: Option<(String, Panel)>,
    world: World<Obj>,
    // None until a trajectory loads
    animator: Option<Animator>,
    // The waypoint the marker sits on, and its index
    marker: Option<(Waypoint, usize)>,
    // Only these tracks are drawn. None means all of them.
    visible_tracks: Option<Vec<usize>>,
}

impl Viewer {
    pub fn new_state(ctx: &mut EventCtx, app: &App) -> Box<dyn State<App>> {
        let mut state = Self {
            panel: make_panel(ctx),
            document: None,
            world: World::unbounded(),
            animator: None,
            marker: None,
            visible_tracks: None,
        };
        state.on_tracks_change(ctx, app);
        state.on_flows_change(ctx, app);
        Box::new(state)
    }

    /// Loads the trajectory, then the flow series, then hands control back to the viewer
    pub fn load_sources(
        ctx: &mut EventCtx,
        trajectory: Source,
        flows: Source,
    ) -> Box<dyn State<App>> {
        SourceLoader::new_state(
            ctx,
            trajectory,
            "Loading flight trajectories",
            Box::new(move |ctx: &mut EventCtx, app: &mut App, result: Result<Vec<u8>>| {
                if let Err(err) = result.and_then(|bytes| app.model.load_tracks(&bytes)) {
                    error!("Couldn't load flight trajectories: {err}");
                }
                app.fit_canvas(ctx);
                Transition::Multi(vec![
                    Transition::Pop,
                    Transition::ModifyState(Box::new(|state, ctx, app| {
                        if let Some(viewer) = state.downcast_mut::<Viewer>() {
                            viewer.on_tracks_change(ctx, app);
                        }
                    })),
                    Transition::Push(load_flows(ctx, flows)),
                ])
            }),
        )
    }

    /// Throws away the old animation and starts over on the current first path
    fn on_tracks_change(&mut self, ctx: &mut EventCtx, app: &App) {
        self.marker = None;
        self.animator = match app.model.animator() {
            Ok(animator) => animator,
            Err(err) => {
                error!("Can't animate: {err}");
                None
            }
        };
        // The marker jumps to the first point right away
        if let Some(waypoint) = self.animator.as_mut().and_then(|a| a.tick()) {
            self.marker = Some((waypoint, 0));
            if !app.restored_camera {
                ctx.canvas
                    .center_on_map_pt(waypoint.pos().to_pt(&app.model.gps_bounds));
            }
        }

        let legend = Widget::col(vec![
            Line("Flight trajectory").fg(TRACK_COLOR).into_widget(ctx),
            format!("{} tracks loaded", app.model.tracks.len()).text_widget(ctx),
        ]);
        self.panel.replace(ctx, "legend", legend);
        self.update_animation_controls(ctx);
        self.world = self.make_world(ctx, app);
    }

    fn update_animation_controls(&mut self, ctx: &mut EventCtx) {
        let controls = match self.animator {
            Some(ref animator) if animator.is_running() => ctx
                .style()
                .btn_plain
                .text("pause animation")
                .build_def(ctx),
            Some(_) => ctx
                .style()
                .btn_outline
                .text("resume animation")
                .build_def(ctx),
            None => Widget::nothing(),
        };
        self.panel.replace(ctx, "animation controls", controls);
    }

    fn on_flows_change(&mut self, ctx: &mut EventCtx, app: &App) {
        let status = match app.model.flows {
            FlowSeries::Pending => "Flow data hasn't loaded yet".to_string(),
            FlowSeries::Loaded(ref records) => format!("{} flow records loaded", records.len()),
            FlowSeries::Failed(ref err) => format!("Flow data couldn't be loaded: {err}"),
        };
        self.panel.replace(ctx, "results", status.text_widget(ctx));
        self.document = None;
    }

    fn move_marker(&mut self, ctx: &mut EventCtx, app: &App, waypoint: Waypoint) {
        let idx = match self.animator {
            // The cursor already moved past this waypoint
            Some(ref animator) => {
                let len = animator.waypoints().len();
                (animator.cursor() + len - 1) % len
            }
            None => 0,
        };
        self.marker = Some((waypoint, idx));
        self.world = self.make_world(ctx, app);
    }

    fn search_flight(&mut self, ctx: &mut EventCtx, app: &App) -> Transition {
        let search = app.model.search_flight(&self.panel.text_box("flight id"));
        info!("{}", search.describe());
        self.visible_tracks = Some(match search {
            FlightSearch::MissingInput => {
                return Transition::Push(PopupMsg::new_state(
                    ctx,
                    "Search flight",
                    vec![search.describe()],
                ));
            }
            FlightSearch::NoMatch(_) => Vec::new(),
            FlightSearch::Matches(_, ref tracks) => tracks.clone(),
        });
        self.panel
            .replace(ctx, "flight status", search.describe().text_widget(ctx));
        self.world = self.make_world(ctx, app);

        if let Some((waypoint, _)) = self.marker {
            ctx.canvas
                .center_on_map_pt(waypoint.pos().to_pt(&app.model.gps_bounds));
        }
        Transition::Keep
    }

    fn show_all_flights(&mut self, ctx: &mut EventCtx, app: &App) {
        self.visible_tracks = None;
        self.panel.replace(ctx, "flight status", Widget::nothing());
        self.world = self.make_world(ctx, app);
    }

    fn predict_flow(&mut self, ctx: &mut EventCtx, app: &App) -> Transition {
        let input = date_time::from_controls(&self.panel);
        let query = app.model.query_flow(&input);
        info!("Flow lookup for {input}: {}", query.describe());
        if query.is_blocking() {
            return Transition::Push(PopupMsg::new_state(
                ctx,
                "Flow prediction",
                vec![query.describe()],
            ));
        }

        let results = describe::flow_query(&query).into_widget(ctx);
        self.panel.replace(ctx, "results", results);
        self.document = query
            .document()
            .map(|doc| (doc.to_string(), make_document_panel(ctx, doc)));
        Transition::Keep
    }

    fn make_world(&self, ctx: &mut EventCtx, app: &App) -> World<Obj> {
        let mut world = World::bounded(&app.model.bounds);
        let gps_bounds = &app.model.gps_bounds;

        for (track_idx, track) in app.model.tracks.iter().enumerate() {
            if let Some(ref visible) = self.visible_tracks {
                if !visible.contains(&track_idx) {
                    continue;
                }
            }
            for (path_idx, path) in track.paths.iter().enumerate() {
                let pts: Vec<Pt2D> = path.iter().map(|w| w.pos().to_pt(gps_bounds)).collect();
                let pl = match PolyLine::new(Pt2D::approx_dedupe(pts, Distance::meters(1.0))) {
                    Ok(pl) => pl,
                    Err(err) => {
                        debug!("Not drawing path {path_idx} of {:?}: {err}", track.flight_id);
                        continue;
                    }
                };
                world
                    .add(Obj::Track(track_idx, path_idx))
                    .hitbox(pl.make_polygons(Distance::meters(30.0)))
                    .draw_color(TRACK_COLOR)
                    .hover_alpha(0.5)
                    .tooltip(describe::track(track))
                    .build(ctx);
            }
        }

        if let (Some((waypoint, idx)), Some(animator)) = (self.marker, self.animator.as_ref()) {
            world
                .add(Obj::Marker)
                .hitbox(
                    Circle::new(waypoint.pos().to_pt(gps_bounds), Distance::meters(150.0))
                        .to_polygon(),
                )
                .draw_color(MARKER_COLOR)
                .hover_alpha(0.5)
                .tooltip(describe::marker(&waypoint, idx, animator.waypoints().len()))
                .build(ctx);
        }

        world.initialize_hover(ctx);
        world
    }
}

impl State<App> for Viewer {
    fn event(&mut self, ctx: &mut EventCtx, app: &mut App) -> Transition {
        ctx.canvas_movement();

        if let Some(dt) = ctx.input.nonblocking_is_update_event() {
            ctx.input.use_update_event();
            if let Some(waypoint) = self.animator.as_mut().and_then(|a| a.advance(dt)) {
                self.move_marker(ctx, app, waypoint);
            }
        }
        if self
            .animator
            .as_ref()
            .map(|a| a.is_running() && !a.waypoints().is_empty())
            .unwrap_or(false)
        {
            ctx.request_update(UpdateType::Game);
        }

        self.world.event(ctx);

        let document_clicked = match self.document {
            Some((_, ref mut panel)) => match panel.event(ctx) {
                Outcome::Clicked(x) => Some(x),
                _ => None,
            },
            None => None,
        };
        if let Some(x) = document_clicked {
            match x.as_ref() {
                "open document" => {
                    if let Some((ref doc, _)) = self.document {
                        open_browser(doc);
                    }
                }
                "close" => {
                    self.document = None;
                }
                _ => unreachable!(),
            }
        }

        if let Outcome::Clicked(x) = self.panel.event(ctx) {
            match x.as_ref() {
                "search flight" => {
                    return self.search_flight(ctx, app);
                }
                "show all flights" => {
                    self.show_all_flights(ctx, app);
                }
                "predict flow" => {
                    return self.predict_flow(ctx, app);
                }
                "pause animation" => {
                    if let Some(ref mut animator) = self.animator {
                        animator.stop();
                    }
                    self.update_animation_controls(ctx);
                }
                "resume animation" => {
                    if let Some(ref mut animator) = self.animator {
                        animator.resume();
                    }
                    self.update_animation_controls(ctx);
                }
                "load flow CSV" => {
                    return Transition::Push(FileLoader::new_state(
                        ctx,
                        Box::new(
                            |_: &mut EventCtx, app: &mut App, result: Result<Option<Vec<u8>>>| {
                                match result {
                                    Ok(Some(bytes)) => app.model.set_flows(Ok(bytes)),
                                    // The user cancelled; keep what's loaded
                                    Ok(None) => {}
                                    Err(err) => app.model.set_flows(Err(err)),
                                }
                                refresh_flows()
                            },
                        ),
                    ));
                }
                _ => unreachable!(),
            }
        }

        Transition::Keep
    }

    fn draw(&self, g: &mut GfxCtx, _: &App) {
        self.world.draw(g);
        self.panel.draw(g);
        if let Some((_, ref panel)) = self.document {
            panel.draw(g);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Obj {
    // (track, path)
    Track(usize, usize),
    Marker,
}
impl ObjectID for Obj {}

fn load_flows(ctx: &mut EventCtx, flows: Source) -> Box<dyn State<App>> {
    SourceLoader::new_state(
        ctx,
        flows,
        "Loading flow data",
        Box::new(|_: &mut EventCtx, app: &mut App, result: Result<Vec<u8>>| {
            app.model.set_flows(result);
            refresh_flows()
        }),
    )
}

// Pops the loader and tells the viewer underneath
fn refresh_flows() -> Transition {
    Transition::Multi(vec![
        Transition::Pop,
        Transition::ModifyState(Box::new(|state, ctx, app| {
            if let Some(viewer) = state.downcast_mut::<Viewer>() {
                viewer.on_flows_change(ctx, app);
            }
        })),
    ])
}

fn make_panel(ctx: &mut EventCtx) -> Panel {
    let initial = CanonicalTimestamp::parse(model::defaults::QUERY_TIME)
        .expect("default query time must parse")
        .datetime();

    Panel::new_builder(Widget::col(vec![
        Line("Flight Spotting").small_heading().into_widget(ctx),
        Widget::placeholder(ctx, "legend"),
        Widget::placeholder(ctx, "animation controls"),
        Widget::col(vec![
            Widget::row(vec![
                "Flight:".text_widget(ctx),
                TextBox::default_widget(ctx, "flight id", String::new()),
            ]),
            Widget::row(vec![
                ctx.style().btn_outline.text("search flight").build_def(ctx),
                ctx.style().btn_plain.text("show all flights").build_def(ctx),
            ]),
            Widget::placeholder(ctx, "flight status"),
        ])
        .section(ctx),
        Widget::col(vec![
            Line("Flow prediction").small_heading().into_widget(ctx),
            date_time::to_controls(ctx, initial),
            Widget::row(vec![
                ctx.style().btn_outline.text("predict flow").build_def(ctx),
                ctx.style().btn_plain.text("load flow CSV").build_def(ctx),
            ]),
            Widget::placeholder(ctx, "results"),
        ])
        .section(ctx),
    ]))
    .aligned(HorizontalAlignment::Left, VerticalAlignment::Top)
    .build(ctx)
}

fn make_document_panel(ctx: &mut EventCtx, doc: &str) -> Panel {
    Panel::new_builder(Widget::col(vec![
        Widget::row(vec![
            Line("Details for this day").small_heading().into_widget(ctx),
            ctx.style().btn_close_widget(ctx),
        ]),
        doc.text_widget(ctx),
        ctx.style().btn_outline.text("open document").build_def(ctx),
    ]))
    .aligned(HorizontalAlignment::Right, VerticalAlignment::Top)
    .build(ctx)
}
