mod date;
mod field;
mod form_data;
mod route;
mod trip;
mod validation;

pub use date::{TIMESTAMP_FORMAT, format_timestamp, parse_timestamp};
pub use field::{
    FieldConfig, FieldSection, FieldSpec, FieldType, FieldWidget, InputType, ROUTE_KEY,
    TRIP_ID_KEY,
};
pub use form_data::{FieldValue, FormData};
pub use route::{Route, RouteId, filter_routes, find_route};
pub use trip::TripRecord;
pub use validation::{ValidityError, check_validity};
