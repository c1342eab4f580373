//! End-to-end launch flows against the scripted API and wallet.
//!
//! Every test drives `LaunchOrchestrator::launch` and then inspects the
//! shared call log to check what reached the API and the wallet, and in
//! which order.

use lib_launch::testing::{Call, CallLog, MockLaunchApi, MockSigner, RecordingObserver};
use lib_launch::{
    FeeSplit, ImageUpload, LaunchError, LaunchOrchestrator, LaunchOutcome, LaunchPhase,
    LaunchRequest, SocialLinks, SocialPlatform, TransactionKind,
};
use std::sync::Arc;

const CREATOR: &str = "Alice1111111111111111111111111111111111111";
const CLAIMER: &str = "Bob22222222222222222222222222222222222222";

fn request(name: &str, symbol: &str, username: Option<&str>) -> LaunchRequest {
    LaunchRequest {
        name: name.to_string(),
        symbol: symbol.to_string(),
        description: "A test token".to_string(),
        image: None,
        social_username: username.map(String::from),
        platform: SocialPlatform::Twitter,
        fee_split: FeeSplit::new(1_000, 9_000).unwrap(),
        launch_wallet: CREATOR.to_string(),
        initial_buy_lamports: 0,
        links: SocialLinks::default(),
    }
}

fn orchestrator(api: MockLaunchApi, signer: MockSigner) -> LaunchOrchestrator<MockLaunchApi, MockSigner> {
    LaunchOrchestrator::new(api, Some(signer))
}

fn failure(outcome: LaunchOutcome) -> lib_launch::LaunchFailure {
    match outcome {
        LaunchOutcome::Failure(f) => f,
        LaunchOutcome::Success(s) => panic!("expected failure, got success: {:?}", s),
    }
}

#[tokio::test]
async fn test_scenario_single_phase_without_username() {
    let log = CallLog::default();
    let observer = Arc::new(RecordingObserver::default());
    let orch = orchestrator(MockLaunchApi::new(log.clone()), MockSigner::new(log.clone()))
        .with_observer(observer.clone());

    let outcome = orch.launch(request("Foo", "FOO", Some(""))).await;

    let success = outcome.success().expect("launch should succeed").clone();
    assert_eq!(success.signature, "launch-sig");
    assert!(success.fee_sharing.is_none());
    assert!(success.config_signature.is_none());

    assert_eq!(log.count(|c| matches!(c, Call::Sign(_))), 1);
    assert_eq!(log.count(|c| matches!(c, Call::Broadcast(_))), 1);
    assert_eq!(log.count(|c| matches!(c, Call::Confirm(_))), 1);
    assert_eq!(
        log.count(|c| matches!(c, Call::CreateStandaloneLaunchConfig { .. })),
        1
    );
    assert_eq!(log.count(|c| matches!(c, Call::CreateLaunchTransaction(_))), 1);
    assert_eq!(
        log.count(|c| matches!(c, Call::CreateLaunchTransactionAfterConfig(_))),
        0
    );

    assert_eq!(
        observer.phases(),
        vec![
            LaunchPhase::Validating,
            LaunchPhase::CollectingMetadata,
            LaunchPhase::RequestingLaunchTx,
            LaunchPhase::SigningLaunch,
            LaunchPhase::Confirming,
            LaunchPhase::Done,
        ]
    );
}

#[tokio::test]
async fn test_no_username_never_touches_fee_share() {
    for username in [None, Some(""), Some("@"), Some("  ")] {
        let log = CallLog::default();
        let orch = orchestrator(MockLaunchApi::new(log.clone()), MockSigner::new(log.clone()));

        let outcome = orch.launch(request("Foo", "FOO", username)).await;

        assert!(outcome.is_success(), "username {:?}", username);
        assert_eq!(
            log.count(|c| matches!(
                c,
                Call::LookupPlatformWallet { .. } | Call::CreateFeeShareConfig(_)
            )),
            0,
            "username {:?}",
            username
        );
    }
}

#[tokio::test]
async fn test_scenario_two_phase_with_fee_share() {
    let log = CallLog::default();
    let api = MockLaunchApi::new(log.clone())
        .with_wallet("bob", CLAIMER)
        .with_pending_fee_share_config();
    let observer = Arc::new(RecordingObserver::default());
    let orch = orchestrator(api, MockSigner::new(log.clone())).with_observer(observer.clone());

    let outcome = orch.launch(request("Foo", "FOO", Some("bob"))).await;

    let success = outcome.success().expect("launch should succeed").clone();
    assert_eq!(success.signature, "launch-sig");
    assert_eq!(success.config_signature.as_deref(), Some("config-sig"));
    let summary = success.fee_sharing.expect("fee sharing summary");
    assert_eq!(summary.username, "bob");
    assert_eq!(summary.platform, SocialPlatform::Twitter);
    assert_eq!(summary.creator_percent, 10.0);
    assert_eq!(summary.claimer_percent, 90.0);

    // Creator sorts first, so it takes slot A with its own share
    let fee_request = log
        .calls()
        .into_iter()
        .find_map(|c| match c {
            Call::CreateFeeShareConfig(r) => Some(r),
            _ => None,
        })
        .expect("fee share config requested");
    assert_eq!(fee_request.wallet_a, CREATOR);
    assert_eq!(fee_request.wallet_b, CLAIMER);
    assert_eq!(fee_request.wallet_a_bps, 1_000);
    assert_eq!(fee_request.wallet_b_bps, 9_000);
    assert_eq!(fee_request.payer, CREATOR);
    assert_eq!(
        fee_request.quote_mint,
        "So11111111111111111111111111111111111111112"
    );

    let signing: Vec<Call> = log.calls().into_iter().filter(|c| !c.is_api() || matches!(c, Call::CreateLaunchTransactionAfterConfig(_))).collect();
    assert!(matches!(
        signing.as_slice(),
        [
            Call::Sign(TransactionKind::Config),
            Call::Broadcast(TransactionKind::Config),
            Call::Confirm(config_sig),
            Call::CreateLaunchTransactionAfterConfig(_),
            Call::Sign(TransactionKind::Launch),
            Call::Broadcast(TransactionKind::Launch),
            Call::Confirm(launch_sig),
        ] if config_sig == "config-sig" && launch_sig == "launch-sig"
    ), "unexpected order: {:?}", signing);
    assert_eq!(log.count(|c| matches!(c, Call::CreateLaunchTransaction(_))), 0);

    assert_eq!(
        observer.phases(),
        vec![
            LaunchPhase::Validating,
            LaunchPhase::CollectingMetadata,
            LaunchPhase::ConfiguringFeeShare,
            LaunchPhase::RequestingLaunchTx,
            LaunchPhase::SigningConfig,
            LaunchPhase::RequestingLaunchTxAfterConfig,
            LaunchPhase::SigningLaunch,
            LaunchPhase::Confirming,
            LaunchPhase::Done,
        ]
    );
}

#[tokio::test]
async fn test_after_config_request_carries_config_context() {
    let log = CallLog::default();
    let api = MockLaunchApi::new(log.clone()).with_pending_standalone_config();
    let orch = orchestrator(api, MockSigner::new(log.clone()));

    let mut req = request("Foo", "FOO", None);
    req.initial_buy_lamports = 250_000_000;
    assert!(orch.launch(req).await.is_success());

    let after = log
        .calls()
        .into_iter()
        .find_map(|c| match c {
            Call::CreateLaunchTransactionAfterConfig(r) => Some(r),
            _ => None,
        })
        .expect("after-config launch transaction requested");
    assert_eq!(after.ipfs, "QmHash");
    assert_eq!(after.config_key, "SoloCfg1");
    assert_eq!(after.wallet, CREATOR);
    assert_eq!(after.initial_buy_lamports, 250_000_000);
}

#[tokio::test]
async fn test_claimer_sorting_first_takes_slot_a() {
    let log = CallLog::default();
    let api = MockLaunchApi::new(log.clone()).with_wallet("aaron", "Aaa1111111111111111111111111111111111111");
    let orch = orchestrator(api, MockSigner::new(log.clone()));

    assert!(orch.launch(request("Foo", "FOO", Some("aaron"))).await.is_success());

    let fee_request = log
        .calls()
        .into_iter()
        .find_map(|c| match c {
            Call::CreateFeeShareConfig(r) => Some(r),
            _ => None,
        })
        .expect("fee share config requested");
    assert_eq!(fee_request.wallet_a, "Aaa1111111111111111111111111111111111111");
    assert_eq!(fee_request.wallet_a_bps, 9_000);
    assert_eq!(fee_request.wallet_b, CREATOR);
    assert_eq!(fee_request.wallet_b_bps, 1_000);

    // No pending config transaction, so the plain launch transaction is used
    assert_eq!(log.count(|c| matches!(c, Call::CreateLaunchTransaction(_))), 1);
    assert_eq!(
        log.count(|c| matches!(c, Call::CreateLaunchTransactionAfterConfig(_))),
        0
    );
    assert_eq!(log.count(|c| matches!(c, Call::Sign(TransactionKind::Config))), 0);
}

#[tokio::test]
async fn test_username_is_cleaned_before_lookup() {
    let log = CallLog::default();
    let api = MockLaunchApi::new(log.clone()).with_wallet("bob", CLAIMER);
    let orch = orchestrator(api, MockSigner::new(log.clone()));

    let outcome = orch
        .launch(request("Foo", "FOO", Some("https://x.com/bob/status/123")))
        .await;

    assert!(outcome.is_success());
    assert_eq!(
        log.position(|c| matches!(c, Call::LookupPlatformWallet { username, .. } if username == "bob")),
        Some(1)
    );
}

#[tokio::test]
async fn test_scenario_unknown_handle_fails_before_signing() {
    let log = CallLog::default();
    let orch = orchestrator(MockLaunchApi::new(log.clone()), MockSigner::new(log.clone()));

    let failure = failure(orch.launch(request("Foo", "FOO", Some("nosuchuser"))).await);

    assert!(matches!(
        &failure.error,
        LaunchError::WalletNotFound { username, .. } if username == "nosuchuser"
    ));
    assert_eq!(failure.phase, LaunchPhase::ConfiguringFeeShare);
    assert!(!failure.is_partial_success());
    assert_eq!(log.count(|c| !c.is_api()), 0);
    assert_eq!(log.count(|c| matches!(c, Call::CreateFeeShareConfig(_))), 0);
}

#[tokio::test]
async fn test_handle_resolving_to_creator_wallet_is_rejected() {
    let log = CallLog::default();
    let api = MockLaunchApi::new(log.clone()).with_wallet("me", CREATOR);
    let orch = orchestrator(api, MockSigner::new(log.clone()));

    let failure = failure(orch.launch(request("Foo", "FOO", Some("me"))).await);

    assert!(matches!(failure.error, LaunchError::Validation(_)));
    assert_eq!(log.count(|c| matches!(c, Call::CreateFeeShareConfig(_))), 0);
}

#[tokio::test]
async fn test_validation_failures_make_no_calls() {
    let cases = vec![
        request("", "FOO", None),
        request("Foo", "  ", None),
        request("Foo", "FOO", Some("12345")),
        request("Foo", "FOO", Some("abcdefghijklmnop")),
    ];

    for req in cases {
        let log = CallLog::default();
        let orch = orchestrator(MockLaunchApi::new(log.clone()), MockSigner::new(log.clone()));

        let failure = failure(orch.launch(req).await);

        assert!(matches!(failure.error, LaunchError::Validation(_)), "{:?}", failure.error);
        assert_eq!(failure.phase, LaunchPhase::Validating);
        assert!(log.calls().is_empty());
    }
}

#[tokio::test]
async fn test_bad_image_fails_without_network() {
    for (size, mime) in [(16 * 1024 * 1024, "image/png"), (1024, "image/bmp")] {
        let log = CallLog::default();
        let orch = orchestrator(MockLaunchApi::new(log.clone()), MockSigner::new(log.clone()));
        let mut req = request("Foo", "FOO", None);
        req.image = Some(ImageUpload {
            file_name: "logo".to_string(),
            mime_type: mime.to_string(),
            bytes: vec![0u8; size],
        });

        let failure = failure(orch.launch(req).await);

        assert!(matches!(failure.error, LaunchError::InvalidMedia(_)));
        assert!(log.calls().is_empty());
    }
}

#[tokio::test]
async fn test_missing_signer_fails_before_network() {
    let log = CallLog::default();
    let orch: LaunchOrchestrator<MockLaunchApi, MockSigner> =
        LaunchOrchestrator::new(MockLaunchApi::new(log.clone()), None);

    let failure = failure(orch.launch(request("Foo", "FOO", None)).await);

    assert!(matches!(failure.error, LaunchError::WalletUnavailable(_)));
    assert!(log.calls().is_empty());
}

#[tokio::test]
async fn test_upstream_error_on_metadata_propagates() {
    let log = CallLog::default();
    let mut api = MockLaunchApi::new(log.clone());
    api.token = Err(LaunchError::Upstream {
        status: Some(500),
        message: "Server error".to_string(),
    });
    let orch = orchestrator(api, MockSigner::new(log.clone()));

    let failure = failure(orch.launch(request("Foo", "FOO", None)).await);

    assert_eq!(
        failure.error,
        LaunchError::Upstream {
            status: Some(500),
            message: "Server error".to_string()
        }
    );
    assert_eq!(failure.phase, LaunchPhase::CollectingMetadata);
    assert_eq!(log.calls().len(), 1);
}

#[tokio::test]
async fn test_launch_rejected_after_config_confirmed_is_partial_success() {
    let log = CallLog::default();
    let api = MockLaunchApi::new(log.clone()).with_pending_standalone_config();
    let signer = MockSigner::new(log.clone()).rejecting(TransactionKind::Launch);
    let orch = orchestrator(api, signer);

    let failure = failure(orch.launch(request("Foo", "FOO", None)).await);

    assert_eq!(failure.error, LaunchError::UserRejected);
    assert_eq!(failure.phase, LaunchPhase::SigningLaunch);
    assert_eq!(failure.config_signature.as_deref(), Some("config-sig"));
    assert!(failure.is_partial_success());
    assert_eq!(log.count(|c| matches!(c, Call::Broadcast(TransactionKind::Launch))), 0);
}

#[tokio::test]
async fn test_config_rejected_on_chain_stops_before_after_config() {
    let log = CallLog::default();
    let api = MockLaunchApi::new(log.clone()).with_pending_standalone_config();
    let signer = MockSigner::new(log.clone()).failing_confirm(
        TransactionKind::Config,
        LaunchError::ChainRejected("{\"InstructionError\":[0,\"Custom\"]}".to_string()),
    );
    let orch = orchestrator(api, signer);

    let failure = failure(orch.launch(request("Foo", "FOO", None)).await);

    assert!(matches!(failure.error, LaunchError::ChainRejected(_)));
    assert_eq!(failure.phase, LaunchPhase::SigningConfig);
    assert!(!failure.is_partial_success());
    assert_eq!(
        log.count(|c| matches!(c, Call::CreateLaunchTransactionAfterConfig(_))),
        0
    );
    assert_eq!(log.count(|c| matches!(c, Call::Sign(TransactionKind::Launch))), 0);
}

#[tokio::test]
async fn test_broadcast_network_error_fails_in_signing_launch() {
    let log = CallLog::default();
    let signer = MockSigner::new(log.clone()).failing_broadcast(
        TransactionKind::Launch,
        LaunchError::Network("connection reset".to_string()),
    );
    let orch = orchestrator(MockLaunchApi::new(log.clone()), signer);

    let failure = failure(orch.launch(request("Foo", "FOO", None)).await);

    assert!(matches!(failure.error, LaunchError::Network(_)));
    assert_eq!(failure.phase, LaunchPhase::SigningLaunch);
    assert_eq!(log.count(|c| matches!(c, Call::Confirm(_))), 0);
}

#[tokio::test]
async fn test_launch_confirmation_timeout_is_distinct() {
    let log = CallLog::default();
    let signer = MockSigner::new(log.clone()).failing_confirm(
        TransactionKind::Launch,
        LaunchError::ConfirmationTimeout {
            signature: "launch-sig".to_string(),
            waited_secs: 60,
        },
    );
    let observer = Arc::new(RecordingObserver::default());
    let orch = orchestrator(MockLaunchApi::new(log.clone()), signer).with_observer(observer.clone());

    let failure = failure(orch.launch(request("Foo", "FOO", None)).await);

    assert_eq!(failure.error.code(), "confirmation_timeout_error");
    assert_eq!(failure.phase, LaunchPhase::Confirming);
    assert_eq!(observer.phases().last(), Some(&LaunchPhase::Failed));
}

#[tokio::test]
async fn test_attempts_share_no_state() {
    let log = CallLog::default();
    let api = MockLaunchApi::new(log.clone()).with_wallet("bob", CLAIMER);
    let orch = orchestrator(api, MockSigner::new(log.clone()));

    let first = orch.launch(request("Foo", "FOO", Some("bob"))).await;
    let second = orch.launch(request("Foo", "FOO", None)).await;

    assert!(first.success().and_then(|s| s.fee_sharing.as_ref()).is_some());
    assert!(second.success().and_then(|s| s.fee_sharing.as_ref()).is_none());
    assert_eq!(log.count(|c| matches!(c, Call::CreateTokenInfo { .. })), 2);
}
