/// Version stamped by `build.rs`: `ATLAS_BUILD_VERSION`, then `git describe`, then `dev`.
pub const GIT_VERSION: &str = env!("GIT_VERSION");

pub fn user_agent() -> String {
    format!("atlas/{}", GIT_VERSION)
}
