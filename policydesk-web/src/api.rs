use client::HttpPolicyApi;
use once_cell::unsync::OnceCell;

use crate::config::FrontendConfig;

thread_local! {
    static SHARED_API: OnceCell<HttpPolicyApi> = const { OnceCell::new() };
}

/// The page-wide API client, built from [`FrontendConfig`] on first use.
pub fn shared() -> HttpPolicyApi {
    SHARED_API.with(|cell| {
        cell.get_or_init(|| HttpPolicyApi::new(FrontendConfig::new().api_base_url()))
            .clone()
    })
}
