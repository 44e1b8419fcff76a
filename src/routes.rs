use crate::guard::Area;

/// Landing path for the root and any unmatched route.
pub const DEFAULT_PATH: &str = "/customer";

/// How a client-visible path is handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteMatch {
    /// Path belongs to an area; run the access guard before rendering.
    Guarded(Area),
    /// Path is unknown; navigate to the given path instead.
    Redirect(&'static str),
}

/// Maps a path to its guarded area, or to the default redirect.
pub fn resolve(path: &str) -> RouteMatch {
    match path {
        "/customer" | "/customer/profile" | "/customer/orders" | "/customer/cart" => {
            RouteMatch::Guarded(Area::Customer)
        }
        "/customer/login" | "/customer/register" => RouteMatch::Guarded(Area::CustomerAuth),
        "/rider" | "/rider/profile" | "/rider/orders" | "/rider/earnings" => {
            RouteMatch::Guarded(Area::Rider)
        }
        "/rider/login" | "/rider/register" => RouteMatch::Guarded(Area::RiderAuth),
        _ => RouteMatch::Redirect(DEFAULT_PATH),
    }
}
