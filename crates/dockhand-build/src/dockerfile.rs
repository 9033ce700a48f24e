use std::collections::BTreeMap;
use std::fmt::Write;

use crate::env::{CONTAINER_PORT, RACK_CONFIG_VAR};

/// Rack bootstrap archive, unpacked into /home/heroku_rack when the app's
/// environment references it.
const RACK_SHIM_URL: &str = "http://cl.ly/2k1p1K0i032f/heroku_rack.tgz";

/// User the container runs as; the unpacked slug is chowned to it.
pub const RUNTIME_USER: &str = "nobody";

/// Renders the image-definition manifest for one release.
///
/// The instruction sequence is fixed and the injected environment is emitted
/// in sorted key order, so identical inputs produce byte-identical output.
pub struct DockerfileGenerator<'a> {
    base_image: &'a str,
    slug_url: &'a str,
    command: &'a str,
    env: &'a BTreeMap<String, String>,
}

impl<'a> DockerfileGenerator<'a> {
    pub fn new(
        base_image: &'a str,
        slug_url: &'a str,
        command: &'a str,
        env: &'a BTreeMap<String, String>,
    ) -> Self {
        Self {
            base_image,
            slug_url,
            command,
            env,
        }
    }

    pub fn render(&self) -> String {
        let mut envs = String::new();
        for (key, value) in self.env {
            let _ = writeln!(envs, "ENV {key} {value}");
        }

        let rack_shim = if self.env.contains_key(RACK_CONFIG_VAR) {
            format!(
                "WORKDIR /home/heroku_rack\n\
                 RUN curl -L '{RACK_SHIM_URL}' | tar xz\n"
            )
        } else {
            String::new()
        };

        let text = format!(
            r#"
            FROM {base}
            RUN rm -rf /app
            RUN curl '{slug}' -o /slug.img
            RUN unsquashfs -d /app /slug.img || (mkdir -p /app && tar -xzf /slug.img -C /app)
            RUN rm -rf /app/log /app/tmp && mkdir /app/log /app/tmp
            RUN chown -R {user}:nogroup /app
            {rack_shim}ADD database.yml /app/config/database.yml
            {envs}WORKDIR /app
            EXPOSE {port}
            CMD {command}
            "#,
            base = self.base_image,
            slug = self.slug_url,
            user = RUNTIME_USER,
            rack_shim = rack_shim,
            envs = envs,
            port = CONTAINER_PORT,
            command = self.command,
        );

        // The template above is indented for readability; the manifest is not.
        let mut out = String::new();
        for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}
