use anyhow::Result;
use widgetry::tools::FutureLoader;
use widgetry::{EventCtx, State, Transition};

use crate::source::Source;

/// Lets the user pick a local file
pub struct FileLoader;

impl FileLoader {
    pub fn new_state<A: 'static>(
        ctx: &mut EventCtx,
        on_load: Box<dyn FnOnce(&mut EventCtx, &mut A, Result<Option<Vec<u8>>>) -> Transition<A>>,
    ) -> Box<dyn State<A>> {
        let (_, outer_progress_rx) = futures_channel::mpsc::channel(1);
        let (_, inner_progress_rx) = futures_channel::mpsc::channel(1);
        FutureLoader::<A, Option<Vec<u8>>>::new_state(
            ctx,
            Box::pin(async move {
                let builder = rfd::AsyncFileDialog::new().add_filter("CSV", &["csv", "txt"]);
                let result = match builder.pick_file().await {
                    Some(file) => Some(file.read().await),
                    None => None,
                };
                let wrap: Box<dyn Send + FnOnce(&A) -> Option<Vec<u8>>> =
                    Box::new(move |_: &A| result);
                Ok(wrap)
            }),
            outer_progress_rx,
            inner_progress_rx,
            "Waiting for a file to be chosen",
            on_load,
        )
    }
}

/// Reads a path or fetches a URL without blocking the UI
pub struct SourceLoader;

impl SourceLoader {
    pub fn new_state<A: 'static>(
        ctx: &mut EventCtx,
        source: Source,
        title: &str,
        on_load: Box<dyn FnOnce(&mut EventCtx, &mut A, Result<Vec<u8>>) -> Transition<A>>,
    ) -> Box<dyn State<A>> {
        let (_, outer_progress_rx) = futures_channel::mpsc::channel(1);
        let (_, inner_progress_rx) = futures_channel::mpsc::channel(1);
        FutureLoader::<A, Vec<u8>>::new_state(
            ctx,
            Box::pin(async move {
                let bytes = source.read().await?;
                let wrap: Box<dyn Send + FnOnce(&A) -> Vec<u8>> = Box::new(move |_: &A| bytes);
                Ok(wrap)
            }),
            outer_progress_rx,
            inner_progress_rx,
            title,
            on_load,
        )
    }
}
