// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

const DEFAULT_LOCALE: &str = "en";

/// Connection parameters sent to Telegram whenever a new connection is initialized.
#[derive(Clone, Debug)]
pub struct ConnectionParams {
    pub device_model: String,
    pub system_version: String,
    pub app_version: String,
    pub system_lang_code: String,
    pub lang_pack: String,
    pub lang_code: String,
}

impl Default for ConnectionParams {
    fn default() -> Self {
        let info = os_info::get();

        let locale_or_default = |locale: String| {
            if locale.is_empty() {
                DEFAULT_LOCALE.to_owned()
            } else {
                locale
            }
        };

        #[cfg(not(target_os = "android"))]
        let (system_lang_code, lang_code) = (locate_locale::system(), locate_locale::user());
        #[cfg(target_os = "android")]
        let (system_lang_code, lang_code) = (String::new(), String::new());

        Self {
            device_model: format!("{} {}", info.os_type(), info.bitness()),
            system_version: info.version().to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            system_lang_code: locale_or_default(system_lang_code),
            lang_pack: String::new(),
            lang_code: locale_or_default(lang_code),
        }
    }
}
