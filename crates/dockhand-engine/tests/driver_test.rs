use std::path::PathBuf;

use dockhand_engine::docker::DockerError;
use dockhand_engine::driver::{DockerDriver, EngineError};
use dockhand_engine::executor::DockerExecutor;
use mockall::mock;

mock! {
    Executor {}

    impl DockerExecutor for Executor {
        async fn exec(&self, args: &[String]) -> Result<String, DockerError>;
        async fn exec_streaming(&self, args: &[String]) -> Result<(), DockerError>;
    }
}

// ── Build Tests ──

#[tokio::test]
async fn build_invokes_docker_build_with_tag_and_dir() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_streaming()
        .withf(|args| {
            args == [
                "build".to_owned(),
                "-t".to_owned(),
                "myapp".to_owned(),
                "/tmp/context".to_owned(),
            ]
        })
        .returning(|_| Ok(()));

    let driver = DockerDriver::with_executor(mock);
    let result = driver.build(&PathBuf::from("/tmp/context"), "myapp").await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn build_failure_surfaces_engine_exit() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_streaming().returning(|args| {
        Err(DockerError::CommandFailed {
            args: args.to_vec(),
            stderr: "exit code: 1".to_owned(),
        })
    });

    let driver = DockerDriver::with_executor(mock);
    let result = driver.build(&PathBuf::from("/tmp/context"), "myapp").await;

    assert!(matches!(result, Err(EngineError::Build { .. })));
}

// ── Run Tests ──

#[tokio::test]
async fn run_interactive_mounts_env_file_and_drops_privileges() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_streaming()
        .withf(|args| {
            args.contains(&"-it".to_owned())
                && args.contains(&"-P".to_owned())
                && args.contains(&"-u".to_owned())
                && args.contains(&"nobody".to_owned())
                && args.contains(&"--env-file=/tmp/run/.env".to_owned())
                && args.contains(&"myapp".to_owned())
                && !args.contains(&"-d".to_owned())
        })
        .returning(|_| Ok(()));

    let driver = DockerDriver::with_executor(mock);
    let result = driver
        .run("myapp", &PathBuf::from("/tmp/run/.env"), false, &[])
        .await;

    assert_eq!(result.unwrap(), None);
}

#[tokio::test]
async fn run_detached_returns_the_container_id() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .withf(|args| args.contains(&"-d".to_owned()) && !args.contains(&"-it".to_owned()))
        .returning(|_| Ok("f2a9c81b44dd\n".to_owned()));

    let driver = DockerDriver::with_executor(mock);
    let id = driver
        .run("myapp", &PathBuf::from("/tmp/run/.env"), true, &[])
        .await
        .unwrap();

    assert_eq!(id.as_deref(), Some("f2a9c81b44dd"));
}

#[tokio::test]
async fn run_passes_trailing_arguments_through_verbatim() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_streaming()
        .withf(|args| {
            let image_pos = args.iter().position(|a| a == "myapp").unwrap();
            args[image_pos + 1..] == ["rake".to_owned(), "db:migrate".to_owned()]
        })
        .returning(|_| Ok(()));

    let driver = DockerDriver::with_executor(mock);
    let extra = vec!["rake".to_owned(), "db:migrate".to_owned()];
    let result = driver
        .run("myapp", &PathBuf::from("/tmp/run/.env"), false, &extra)
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn run_failure_surfaces_engine_exit() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_streaming().returning(|args| {
        Err(DockerError::CommandFailed {
            args: args.to_vec(),
            stderr: "exit code: 125".to_owned(),
        })
    });

    let driver = DockerDriver::with_executor(mock);
    let result = driver
        .run("myapp", &PathBuf::from("/tmp/run/.env"), false, &[])
        .await;

    assert!(matches!(result, Err(EngineError::Run { .. })));
}
