//! Retrieves information about the version of the engine from Git and the build
//! environment. It is embedded into the binary by `shadow-rs` and printed on
//! startup.

fn main() -> shadow_rs::SdResult<()> {
    shadow_rs::new()
}
