//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 配置 -> dispatcher -> transport 全链路
//! - 故障转移与隔离的跨 crate 场景
//! - 多调用方共享 dispatcher

#[cfg(test)]
mod e2e_tests {
    use std::fs;
    use std::sync::{Arc, Mutex};
    use std::thread;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{EntryLog, Message, SharedTransport, Transport};
    use dispatcher::{
        create_dispatcher, BalancedTransport, CallJournal, DispatcherBuilder, DispatcherError,
        MemoryLog, MockBehavior, MockTransport, RotatingDispatcher, SharedDispatcher,
    };
    use observability::DispatchStats;

    fn message(id: &str) -> Message {
        Message::new(
            id,
            "ops@example.com",
            vec!["a@example.com".into(), "b@example.com".into()],
        )
        .with_subject("nightly report")
        .with_body("all green")
    }

    /// 端到端：TOML 配置 -> dispatcher -> 文件 spool
    ///
    /// 第一个 file transport 指向目录，`start` 失败后被隔离；第二个负责写入消息。
    #[test]
    fn test_e2e_failover_to_second_spool() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken");
        fs::create_dir_all(&broken).unwrap();
        let spool = dir.path().join("spool").join("out.jsonl");

        let config = format!(
            r#"
[dispatcher]
name = "e2e"
journal = "memory"

[[transports]]
name = "broken"
transport_type = "file"
[transports.params]
path = "{}"

[[transports]]
name = "spool"
transport_type = "file"
[transports.params]
path = "{}"
"#,
            broken.display(),
            spool.display()
        );

        let blueprint = ConfigLoader::load_from_str(&config, ConfigFormat::Toml)
            .unwrap()
            .blueprint;
        let log = Arc::new(MemoryLog::new());
        let mut dispatcher =
            DispatcherBuilder::new(blueprint.dispatcher.clone(), blueprint.transports.clone())
                .with_log(Arc::clone(&log) as Arc<dyn EntryLog>)
                .build()
                .unwrap();

        assert_eq!(dispatcher.dispatch(&message("m1")).unwrap(), 2);
        assert_eq!(dispatcher.working_names(), vec!["spool"]);
        assert_eq!(dispatcher.quarantined_names(), vec!["broken"]);

        // 后续消息直接写入健康的 spool
        assert_eq!(dispatcher.dispatch(&message("m2")).unwrap(), 2);
        dispatcher.deactivate().unwrap();

        let content = fs::read_to_string(&spool).unwrap();
        let ids: Vec<String> = content
            .lines()
            .map(|line| {
                let value: serde_json::Value = serde_json::from_str(line).unwrap();
                value["message"]["id"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(ids, vec!["m1", "m2"]);

        let entries = log.entries();
        assert_eq!(entries[0], "++ 2 Transports loaded");
        assert!(entries
            .iter()
            .any(|e| e.contains("FileTransport deemed useless; disabling")));
        assert_eq!(entries.last().unwrap(), "++ Stopping all Transports");
    }

    #[test]
    fn test_e2e_null_then_log_from_json_config() {
        let config = r#"{
            "transports": [
                { "name": "blackhole", "transport_type": "null" },
                { "name": "primary", "transport_type": "log" }
            ]
        }"#;
        let loaded = ConfigLoader::load_from_str(config, ConfigFormat::Json).unwrap();
        assert!(!loaded.has_warnings());
        let mut dispatcher = create_dispatcher(&loaded.blueprint).unwrap();

        assert_eq!(dispatcher.dispatch(&message("m1")).unwrap(), 2);
        assert_eq!(dispatcher.working_names(), vec!["blackhole", "primary"]);
        assert!(dispatcher.quarantined_names().is_empty());
    }

    /// 由配置构建的 dispatcher 作为单个 transport 参与外层轮转
    ///
    /// 内层两个 spool 均不可用，内层耗尽后被外层隔离，外层转移到 mock。
    #[test]
    fn test_e2e_nested_pool_is_quarantined_as_one_transport() {
        let dir = tempfile::tempdir().unwrap();
        let spool_a = dir.path().join("a");
        let spool_b = dir.path().join("b");
        fs::create_dir_all(&spool_a).unwrap();
        fs::create_dir_all(&spool_b).unwrap();

        let config = format!(
            r#"{{
                "dispatcher": {{ "name": "inner" }},
                "transports": [
                    {{ "name": "a", "transport_type": "file", "params": {{ "path": "{}" }} }},
                    {{ "name": "b", "transport_type": "file", "params": {{ "path": "{}" }} }}
                ]
            }}"#,
            spool_a.display(),
            spool_b.display()
        );
        let loaded = ConfigLoader::load_from_str(&config, ConfigFormat::Json).unwrap();
        let inner = create_dispatcher(&loaded.blueprint).unwrap();
        let pool = Arc::new(BalancedTransport::new("spools", inner));
        let fallback = Arc::new(MockTransport::new("fallback", MockBehavior::AcceptAll));

        let log = Arc::new(MemoryLog::new());
        let mut outer = RotatingDispatcher::new("outer", Arc::clone(&log) as Arc<dyn EntryLog>);
        outer.configure(vec![
            Arc::clone(&pool) as SharedTransport,
            Arc::clone(&fallback) as SharedTransport,
        ]);

        assert_eq!(outer.dispatch(&message("m1")).unwrap(), 2);
        assert_eq!(outer.quarantined_names(), vec!["spools"]);
        assert_eq!(outer.working_names(), vec!["fallback"]);
        assert_eq!(pool.dispatcher().quarantined_names(), vec!["a", "b"]);
        assert!(!pool.is_started());
        assert!(log
            .entries()
            .iter()
            .any(|e| e.contains("BalancedTransport deemed useless; disabling")));
    }

    #[test]
    fn test_e2e_exhaustion_then_reactivation() {
        let journal = CallJournal::new();
        let a = Arc::new(MockTransport::new("a", MockBehavior::Fail).with_journal(&journal));
        let b = Arc::new(MockTransport::new("b", MockBehavior::Fail).with_journal(&journal));

        let mut dispatcher = RotatingDispatcher::new("recovery", Arc::new(MemoryLog::new()));
        dispatcher.configure(vec![
            Arc::clone(&a) as SharedTransport,
            Arc::clone(&b) as SharedTransport,
        ]);

        let mut stats = DispatchStats::new();
        let result = dispatcher.dispatch(&message("m1"));
        assert!(matches!(result, Err(DispatcherError::AllTransportsFailed)));
        stats.update(result.ok());
        assert!(!dispatcher.is_active());
        assert_eq!(dispatcher.all().len(), 2);

        // 显式 activate 之前保持耗尽
        assert!(dispatcher.dispatch(&message("m2")).is_err());
        assert_eq!(a.send_count(), 1);

        b.set_behavior(MockBehavior::AcceptAll);
        dispatcher.activate();
        let result = dispatcher.dispatch(&message("m3"));
        stats.update(result.as_ref().ok().copied());

        assert_eq!(result.unwrap(), 2);
        assert_eq!(dispatcher.working_names(), vec!["b"]);
        assert_eq!(dispatcher.quarantined_names(), vec!["a"]);
        assert_eq!(stats.exhausted, 1);
        assert_eq!(stats.accepted, 1);
        assert_eq!(journal.names_for("send"), vec!["a", "b", "a", "b"]);
    }

    #[test]
    fn test_shared_dispatcher_across_threads() {
        let transports: Vec<Arc<MockTransport>> = ["a", "b", "c"]
            .into_iter()
            .map(|name| Arc::new(MockTransport::new(name, MockBehavior::Accept(1))))
            .collect();

        let mut dispatcher = RotatingDispatcher::new("shared", Arc::new(MemoryLog::new()));
        dispatcher.configure(
            transports
                .iter()
                .map(|t| Arc::clone(t) as SharedTransport)
                .collect(),
        );
        let shared: SharedDispatcher = Arc::new(Mutex::new(dispatcher));

        let workers: Vec<_> = (0..4)
            .map(|worker| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    for i in 0..6 {
                        let msg = message(&format!("w{worker}-{i}"));
                        let accepted = shared.lock().unwrap().dispatch(&msg).unwrap();
                        assert_eq!(accepted, 1);
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        // 24 次分发、3 个 transport，严格轮转
        for transport in &transports {
            assert_eq!(transport.send_count(), 8);
            assert_eq!(transport.start_count(), 1);
            assert!(transport.is_started());
        }
        let guard = shared.lock().unwrap();
        assert_eq!(guard.metrics().snapshot().dispatch_count, 24);
        assert_eq!(guard.metrics().snapshot().accepted_recipients, 24);
    }
}
