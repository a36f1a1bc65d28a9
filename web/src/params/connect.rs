use serde::Deserialize;
use utoipa::IntoParams;

/// Query parameters a client sends when opening its message stream.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct ConnectParams {
    /// Identity the connection is registered under.
    pub(crate) user_id: String,
    /// Display name, only used for logging.
    pub(crate) name: Option<String>,
}
