//! Inline HTML for the search page and the rendered weather report.

use weather_core::WeatherRecord;

fn layout(body: &str) -> String {
    format!(
        "<!doctype html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>Weather lookup</title>\n\
         </head>\n\
         <body>\n{body}</body>\n\
         </html>\n"
    )
}

const SEARCH_FORM: &str = "<form method=\"post\" action=\"/weather\">\n\
  <label for=\"city\">City name</label>\n\
  <input id=\"city\" name=\"city\" type=\"text\" placeholder=\"Tokyo\" autofocus>\n\
  <button type=\"submit\">Look up</button>\n\
</form>\n";

/// The search page, with an optional flash message above the form.
pub fn index(flash: Option<&str>) -> String {
    let mut body = String::from("<h1>Weather lookup</h1>\n");
    if let Some(message) = flash {
        body.push_str(&format!("<p class=\"error\">{}</p>\n", escape(message)));
    }
    body.push_str(SEARCH_FORM);
    layout(&body)
}

/// A fetched weather report, with a link back to the search page.
pub fn result(record: &WeatherRecord) -> String {
    let mut rows = vec![
        ("City", format!("{}, {}", escape(&record.city_name), escape(&record.country))),
        ("Weather", escape(&record.description)),
        ("Temperature", format!("{:.1} °C", record.temperature)),
        ("Feels like", format!("{:.1} °C", record.feels_like)),
        ("Humidity", format!("{}%", record.humidity)),
        ("Pressure", format!("{} hPa", record.pressure)),
    ];
    if let Some(speed) = record.wind_speed {
        rows.push(("Wind speed", format!("{speed} m/s")));
    }
    if let Some(deg) = record.wind_direction {
        rows.push(("Wind direction", format!("{deg}°")));
    }
    if let Some(vis) = record.visibility {
        rows.push(("Visibility", format!("{:.1} km", f64::from(vis) / 1000.0)));
    }
    rows.push(("Fetched", record.timestamp.to_rfc3339()));

    let mut body = String::from("<h1>Weather lookup</h1>\n<table>\n");
    for (label, value) in rows {
        body.push_str(&format!("  <tr><th>{label}</th><td>{value}</td></tr>\n"));
    }
    body.push_str("</table>\n<p><a href=\"/\">Look up another city</a></p>\n");
    layout(&body)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
