use dockhand_api::{
    ApiError, App, AttachedDyno, ConfigVars, Formation, PlatformApi, Release, Rendezvous,
    RendezvousError, Slug,
};
use dockhand_build::env::{EnvError, resolve_injected_env};
use dockhand_core::EnvPolicy;
use mockall::mock;

mock! {
    Api {}

    impl PlatformApi for Api {
        async fn get_app(&self, app: &str) -> Result<App, ApiError>;
        async fn get_releases(&self, app: &str) -> Result<Vec<Release>, ApiError>;
        async fn get_slug(&self, app: &str, slug_id: &str) -> Result<Slug, ApiError>;
        async fn get_formation(&self, app: &str) -> Result<Vec<Formation>, ApiError>;
        async fn get_config_vars(&self, app: &str) -> Result<ConfigVars, ApiError>;
        async fn spawn_env_probe(&self, app: &str) -> Result<AttachedDyno, ApiError>;
    }
}

mock! {
    Session {}

    impl Rendezvous for Session {
        async fn capture(&self, attach_url: &str) -> Result<String, RendezvousError>;
    }
}

fn probe() -> AttachedDyno {
    AttachedDyno {
        attach_url: "rendezvous://rendezvous.example.com:5000/secret".to_owned(),
    }
}

fn config_with_database_url() -> ConfigVars {
    ConfigVars::from([(
        "DATABASE_URL".to_owned(),
        "postgres://u:p@h:5432/d".to_owned(),
    )])
}

// ── Resolution Tests ──

#[tokio::test]
async fn config_vars_are_subtracted_and_overrides_injected() {
    let mut api = MockApi::new();
    api.expect_spawn_env_probe().returning(|_| Ok(probe()));
    api.expect_get_config_vars()
        .returning(|_| Ok(config_with_database_url()));

    let mut session = MockSession::new();
    session.expect_capture().returning(|_| {
        Ok("DATABASE_URL=postgres://u:p@h:5432/d\n\
            PATH=/usr/bin\n\
            SECRET=x\n\
            _=/usr/bin/ruby\n"
            .to_owned())
    });

    let env = resolve_injected_env(&api, &session, &EnvPolicy::default(), "myapp")
        .await
        .unwrap();

    // Config var subtracted, shell marker stripped
    assert!(!env.contains_key("DATABASE_URL"));
    assert!(!env.contains_key("_"));
    // Allowlisted survivor and live-only extras kept
    assert_eq!(env["PATH"], "/usr/bin");
    assert_eq!(env["SECRET"], "x");
    // Container overrides
    assert_eq!(env["PS"], "docker.1");
    assert_eq!(env["PORT"], "5000");
}

#[tokio::test]
async fn path_survives_even_when_duplicated_in_config_vars() {
    let mut api = MockApi::new();
    api.expect_spawn_env_probe().returning(|_| Ok(probe()));
    api.expect_get_config_vars().returning(|_| {
        Ok(ConfigVars::from([
            ("PATH".to_owned(), "/custom/bin".to_owned()),
            ("SECRET".to_owned(), "x".to_owned()),
        ]))
    });

    let mut session = MockSession::new();
    session
        .expect_capture()
        .returning(|_| Ok("PATH=/usr/bin:/custom/bin\nSECRET=x\n".to_owned()));

    let env = resolve_injected_env(&api, &session, &EnvPolicy::default(), "myapp")
        .await
        .unwrap();

    assert_eq!(env["PATH"], "/usr/bin:/custom/bin");
    assert!(!env.contains_key("SECRET"));
}

#[tokio::test]
async fn denylisted_process_identity_keys_never_leak() {
    let mut api = MockApi::new();
    api.expect_spawn_env_probe().returning(|_| Ok(probe()));
    api.expect_get_config_vars().returning(|_| Ok(ConfigVars::new()));

    let mut session = MockSession::new();
    session
        .expect_capture()
        .returning(|_| Ok("DYNO=run.1234\n_=/usr/bin/env\nOLDPWD=/\nSHLVL=1\nHOME=/app\n".to_owned()));

    let env = resolve_injected_env(&api, &session, &EnvPolicy::default(), "myapp")
        .await
        .unwrap();

    assert!(!env.contains_key("DYNO"));
    assert!(!env.contains_key("_"));
    assert!(!env.contains_key("OLDPWD"));
    assert!(!env.contains_key("SHLVL"));
    assert_eq!(env["HOME"], "/app");
}

#[tokio::test]
async fn rack_config_path_is_rewritten_only_when_present() {
    let mut api = MockApi::new();
    api.expect_spawn_env_probe().returning(|_| Ok(probe()));
    api.expect_get_config_vars().returning(|_| Ok(ConfigVars::new()));

    let mut session = MockSession::new();
    session
        .expect_capture()
        .returning(|_| Ok("HEROKU_RACK=/tmp/build/heroku.ru\n".to_owned()));

    let env = resolve_injected_env(&api, &session, &EnvPolicy::default(), "myapp")
        .await
        .unwrap();

    assert_eq!(env["HEROKU_RACK"], "/home/heroku_rack/heroku.ru");
}

#[tokio::test]
async fn rack_config_path_is_not_invented_when_absent() {
    let mut api = MockApi::new();
    api.expect_spawn_env_probe().returning(|_| Ok(probe()));
    api.expect_get_config_vars().returning(|_| Ok(ConfigVars::new()));

    let mut session = MockSession::new();
    session
        .expect_capture()
        .returning(|_| Ok("HOME=/app\n".to_owned()));

    let env = resolve_injected_env(&api, &session, &EnvPolicy::default(), "myapp")
        .await
        .unwrap();

    assert!(!env.contains_key("HEROKU_RACK"));
}

#[tokio::test]
async fn output_iterates_in_sorted_key_order() {
    let mut api = MockApi::new();
    api.expect_spawn_env_probe().returning(|_| Ok(probe()));
    api.expect_get_config_vars().returning(|_| Ok(ConfigVars::new()));

    let mut session = MockSession::new();
    session
        .expect_capture()
        .returning(|_| Ok("ZED=1\nALPHA=2\nMIDDLE=3\n".to_owned()));

    let env = resolve_injected_env(&api, &session, &EnvPolicy::default(), "myapp")
        .await
        .unwrap();

    let keys: Vec<&String> = env.keys().collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[tokio::test]
async fn identical_inputs_resolve_identically() {
    let make_api = || {
        let mut api = MockApi::new();
        api.expect_spawn_env_probe().returning(|_| Ok(probe()));
        api.expect_get_config_vars()
            .returning(|_| Ok(config_with_database_url()));
        api
    };
    let make_session = || {
        let mut session = MockSession::new();
        session
            .expect_capture()
            .returning(|_| Ok("PATH=/usr/bin\nHOME=/app\nDATABASE_URL=x\n".to_owned()));
        session
    };

    let policy = EnvPolicy::default();
    let first = resolve_injected_env(&make_api(), &make_session(), &policy, "myapp")
        .await
        .unwrap();
    let second = resolve_injected_env(&make_api(), &make_session(), &policy, "myapp")
        .await
        .unwrap();

    assert_eq!(first, second);
}

// ── Failure Tests ──

#[tokio::test]
async fn rendezvous_failure_propagates_instead_of_returning_empty() {
    let mut api = MockApi::new();
    api.expect_spawn_env_probe().returning(|_| Ok(probe()));

    let mut session = MockSession::new();
    session.expect_capture().returning(|_| {
        Err(RendezvousError::Connect {
            endpoint: "rendezvous.example.com:5000".to_owned(),
            source: std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
        })
    });

    let result = resolve_injected_env(&api, &session, &EnvPolicy::default(), "myapp").await;

    assert!(matches!(result, Err(EnvError::Rendezvous { .. })));
}

#[tokio::test]
async fn malformed_capture_lines_are_skipped_not_fatal() {
    let mut api = MockApi::new();
    api.expect_spawn_env_probe().returning(|_| Ok(probe()));
    api.expect_get_config_vars().returning(|_| Ok(ConfigVars::new()));

    let mut session = MockSession::new();
    session
        .expect_capture()
        .returning(|_| Ok("PATH=/usr/bin\nconnecting to terminal...\nHOME=/app\n".to_owned()));

    let env = resolve_injected_env(&api, &session, &EnvPolicy::default(), "myapp")
        .await
        .unwrap();

    assert_eq!(env["PATH"], "/usr/bin");
    assert_eq!(env["HOME"], "/app");
    assert!(!env.keys().any(|k| k.contains("connecting")));
}
