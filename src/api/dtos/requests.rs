use serde::Deserialize;

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct CreateBookingRequest {
    pub event_id: Option<String>,
    pub email: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct ListEventsQuery {
    pub tag: Option<String>,
    pub date: Option<String>,
}
