use std::fmt;

use anyhow::anyhow;
use roman_core::Error;
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

fn map_connection_error<E: fmt::Display>(url: &Url) -> impl FnOnce(E) -> Error + '_ {
    move |e: E| Error::Connection {
        message: format!("url:{url}: {e}"),
    }
}

pub(crate) fn endpoint(base_url: &Url, path: &str) -> Result<Url, Error> {
    base_url
        .join(path)
        .map_err(|e| Error::Other(anyhow!("invalid endpoint {path} for {base_url}: {e}")))
}

pub(crate) fn get<T: DeserializeOwned>(agent: &ureq::Agent, url: Url) -> Result<T, Error> {
    agent
        .get(url.as_str())
        .call()
        .map_err(map_connection_error(&url))?
        .into_json::<T>()
        .map_err(map_connection_error(&url))
}

pub(crate) fn post<T: Serialize, U: DeserializeOwned>(
    agent: &ureq::Agent,
    url: Url,
    msg: &T,
) -> Result<U, Error> {
    let body = serde_json::to_value(msg).map_err(|e| Error::Other(e.into()))?;
    agent
        .post(url.as_str())
        .send_json(body)
        .map_err(map_connection_error(&url))?
        .into_json()
        .map_err(map_connection_error(&url))
}
