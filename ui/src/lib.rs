#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod components;
#[cfg(not(target_arch = "wasm32"))]
mod headless;
mod source;
mod viewer;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use structopt::StructOpt;
use widgetry::{Canvas, Color, EventCtx, GfxCtx, Settings, SharedAppState};

use model::{AuxDocuments, Model};

use self::source::Source;

#[derive(StructOpt)]
struct Args {
    /// Path or URL of the flight trajectories, as GeoJSON or Esri JSON. Defaults to the hosted
    /// dataset.
    #[structopt(long)]
    trajectory: Option<String>,
    /// Path or URL of the flow CSV. Defaults to the hosted dataset.
    #[structopt(long)]
    flows: Option<String>,
    /// A JSON file mapping calendar days to auxiliary documents
    #[structopt(long)]
    aux_docs: Option<String>,
    /// Where the auxiliary documents are deployed. Overrides the base in --aux-docs.
    #[structopt(long)]
    asset_base: Option<String>,
    /// Print the flow at this date-time (like 2018-07-07T00:20) and exit, without the viewer
    #[structopt(long)]
    lookup: Option<String>,
}

impl Args {
    fn trajectory(&self) -> Source {
        Source::new(
            self.trajectory
                .as_deref()
                .unwrap_or(model::defaults::TRAJECTORY_URL),
        )
    }

    fn flows(&self) -> Source {
        Source::new(self.flows.as_deref().unwrap_or(model::defaults::FLOWS_URL))
    }

    fn aux_docs(&self) -> Result<AuxDocuments> {
        let mut docs = match self.aux_docs {
            Some(ref path) => AuxDocuments::from_json(&fs_err::read_to_string(path)?)
                .map_err(|err| anyhow!("{path}: {err}"))?,
            None => AuxDocuments::default(),
        };
        if let Some(ref base) = self.asset_base {
            docs = docs.with_base(base.clone());
        }
        Ok(docs)
    }
}

fn run(settings: Settings) {
    abstutil::logger::setup();

    let args = Args::from_iter(abstutil::cli_args());

    let aux_docs = args.aux_docs().unwrap_or_else(|err| {
        error!("Couldn't read auxiliary document config, using the defaults: {err}");
        AuxDocuments::default()
    });

    #[cfg(not(target_arch = "wasm32"))]
    if let Some(ref time) = args.lookup {
        if let Err(err) = headless::lookup(args.flows(), aux_docs, time) {
            error!("Lookup failed: {err}");
            std::process::exit(1);
        }
        return;
    }

    let (trajectory, flows) = (args.trajectory(), args.flows());
    widgetry::run(settings, move |ctx| {
        let mut app = App::new(ctx, Model::empty(aux_docs));
        app.restore_savestate(ctx);

        let states = vec![
            viewer::Viewer::new_state(ctx, &app),
            viewer::Viewer::load_sources(ctx, trajectory, flows),
        ];
        (app, states)
    });
}

pub fn main() {
    let settings = Settings::new("Flight Spotting");
    run(settings);
}

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run_wasm() {
    run(Settings::new("Flight Spotting").root_dom_element_id("loading".to_string()));
}

pub struct App {
    model: Model,

    // Don't jump away from a camera restored from the last session
    restored_camera: bool,
}

impl SharedAppState for App {
    fn draw_default(&self, g: &mut GfxCtx) {
        if cfg!(not(target_arch = "wasm32")) {
            g.clear(Color::BLACK);
        }
    }

    fn before_quit(&self, canvas: &Canvas) {
        let ss = Savestate {
            cam_x: canvas.cam_x,
            cam_y: canvas.cam_y,
            cam_zoom: canvas.cam_zoom,
        };
        abstio::write_json("data/save.json".to_string(), &ss);
    }
}

pub type Transition = widgetry::Transition<App>;

impl App {
    pub fn new(ctx: &mut EventCtx, model: Model) -> Self {
        let app = Self {
            model,
            restored_camera: false,
        };
        app.fit_canvas(ctx);
        app
    }

    /// Call after the model's bounds change
    pub fn fit_canvas(&self, ctx: &mut EventCtx) {
        let bounds = &self.model.bounds;
        ctx.canvas.map_dims = (bounds.max_x, bounds.max_y);
        if !self.restored_camera {
            ctx.canvas.center_on_map_pt(bounds.center());
        }
    }

    // before_quit is never called on web, so this only does something on native
    pub fn restore_savestate(&mut self, ctx: &mut EventCtx) {
        if let Ok(savestate) = abstio::maybe_read_json::<Savestate>(
            "data/save.json".to_string(),
            &mut abstutil::Timer::throwaway(),
        ) {
            ctx.canvas.cam_x = savestate.cam_x;
            ctx.canvas.cam_y = savestate.cam_y;
            ctx.canvas.cam_zoom = savestate.cam_zoom;
            self.restored_camera = true;
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct Savestate {
    cam_x: f64,
    cam_y: f64,
    cam_zoom: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_fall_back_to_hosted_data() -> Result<()> {
        let args = Args::from_iter_safe(vec!["flight_spotting"])?;
        assert_eq!(args.trajectory(), Source::new(model::defaults::TRAJECTORY_URL));
        assert_eq!(args.flows(), Source::new(model::defaults::FLOWS_URL));
        assert_eq!(args.aux_docs()?, AuxDocuments::default());
        Ok(())
    }

    #[test]
    fn asset_base_overrides_config() -> Result<()> {
        let args = Args::from_iter_safe(vec![
            "flight_spotting",
            "--flows",
            "data/result.csv",
            "--asset-base",
            "https://example.org/flights",
        ])?;
        assert_eq!(args.flows(), Source::Path("data/result.csv".to_string()));
        let docs = args.aux_docs()?;
        assert_eq!(
            docs.resolve(chrono::NaiveDate::from_ymd_opt(2018, 7, 9).unwrap()),
            Some("https://example.org/flights/data7_9.html".to_string())
        );
        Ok(())
    }
}
