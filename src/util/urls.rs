/// Google Maps search link for a coordinate.
pub fn google_maps_url(latitude: f64, longitude: f64) -> String {
    format!(
        "https://www.google.com/maps/search/?api=1&query={},{}",
        latitude, longitude
    )
}

/// Apple Maps link for a coordinate.
pub fn apple_maps_url(latitude: f64, longitude: f64) -> String {
    format!("http://maps.apple.com/?ll={},{}&q=Location", latitude, longitude)
}
