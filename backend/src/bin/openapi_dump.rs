//! Print the OpenAPI document as JSON.

use std::io::Write;

use hostwatch::ApiDoc;
use utoipa::OpenApi;

fn main() -> std::io::Result<()> {
    let document = ApiDoc::openapi()
        .to_pretty_json()
        .map_err(|err| std::io::Error::other(format!("serialise OpenAPI document: {err}")))?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{document}")
}
