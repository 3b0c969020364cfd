use chrono::{Datelike, NaiveDateTime, Timelike};
use widgetry::{EventCtx, Panel, Spinner, TextExt, Widget};

use model::defaults::QUERY_STEP_MINUTES;

pub fn to_controls(ctx: &mut EventCtx, datetime: NaiveDateTime) -> Widget {
    Widget::col(vec![
        Widget::row(vec![
            "Year:".text_widget(ctx),
            Spinner::widget(ctx, "year", (2000, 2030), datetime.year(), 1),
        ]),
        Widget::row(vec![
            "Month:".text_widget(ctx),
            Spinner::widget(ctx, "month", (1, 12), datetime.month(), 1),
        ]),
        Widget::row(vec![
            "Day:".text_widget(ctx),
            Spinner::widget(ctx, "day", (1, 31), datetime.day(), 1),
        ]),
        Widget::row(vec![
            "Hour:".text_widget(ctx),
            Spinner::widget(ctx, "hour", (0, 23), datetime.hour(), 1),
        ]),
        Widget::row(vec![
            "Minute:".text_widget(ctx),
            Spinner::widget(
                ctx,
                "minute",
                minute_grid(datetime.minute()),
                datetime.minute(),
                QUERY_STEP_MINUTES,
            ),
        ]),
    ])
}

// Minutes step in QUERY_STEP_MINUTES increments anchored on the initial value, so every reachable
// minute stays on the same grid. 00:20 allows 05, 20, 35 and 50.
fn minute_grid(initial: u32) -> (u32, u32) {
    let low = initial % QUERY_STEP_MINUTES;
    let high = low + (59 - low) / QUERY_STEP_MINUTES * QUERY_STEP_MINUTES;
    (low, high)
}

// The spinners can describe an impossible date, like February 30th. That's left for the lookup to
// reject.
pub fn from_controls(p: &Panel) -> String {
    let year: i32 = p.spinner("year");
    let month: u32 = p.spinner("month");
    let day: u32 = p.spinner("day");
    let hour: u32 = p.spinner("hour");
    let minute: u32 = p.spinner("minute");
    format!("{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}")
}
