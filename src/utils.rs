use wasm_bindgen::JsValue;

/// Wall-clock time in milliseconds since the Unix epoch.
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// `HH:MM` in the browser's local time zone.
pub fn format_local_time(timestamp_ms: f64) -> String {
    let date = js_sys::Date::new(&JsValue::from_f64(timestamp_ms));
    clock_label(date.get_hours(), date.get_minutes())
}

fn clock_label(hours: u32, minutes: u32) -> String {
    format!("{hours:02}:{minutes:02}")
}

pub fn current_year() -> u32 {
    js_sys::Date::new_0().get_full_year()
}
