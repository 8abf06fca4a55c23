//! Tests for forumctl-core

#[cfg(test)]
mod integration_tests {
    use crate::{
        guard, resolve, DummyForumStore, EntityKind, FormatMode, FormatSpec, ForumError,
        ForumResult, ForumRole, ForumStore, TopicQuery, TopicRecord, UserRecord,
    };
    use std::sync::Mutex;

    /// Store that knows a fixed set of users/topics/forums and records lookups
    #[derive(Default)]
    struct LookupStore {
        users: Vec<UserRecord>,
        topics: Vec<u64>,
        forums: Vec<u64>,
        lookups: Mutex<Vec<String>>,
    }

    impl LookupStore {
        fn with_users(users: Vec<UserRecord>) -> Self {
            Self {
                users,
                ..Self::default()
            }
        }

        fn lookups(&self) -> Vec<String> {
            self.lookups.lock().expect("lock").clone()
        }
    }

    impl ForumStore for LookupStore {
        fn lookup_user_by_id(&self, id: u64) -> ForumResult<Option<UserRecord>> {
            self.lookups.lock().expect("lock").push(format!("id:{}", id));
            Ok(self.users.iter().find(|u| u.id == id).cloned())
        }

        fn lookup_user_by_login(&self, login: &str) -> ForumResult<Option<UserRecord>> {
            self.lookups
                .lock()
                .expect("lock")
                .push(format!("login:{}", login));
            Ok(self.users.iter().find(|u| u.login == login).cloned())
        }

        fn topic_exists(&self, topic_id: u64) -> ForumResult<bool> {
            Ok(self.topics.contains(&topic_id))
        }

        fn forum_exists(&self, forum_id: u64) -> ForumResult<bool> {
            Ok(self.forums.contains(&forum_id))
        }

        fn add_favorite(&self, _user_id: u64, _topic_id: u64) -> ForumResult<bool> {
            Ok(false)
        }

        fn remove_favorite(&self, _user_id: u64, _topic_id: u64) -> ForumResult<bool> {
            Ok(false)
        }

        fn favoriters_of(&self, _topic_id: u64) -> ForumResult<Vec<u64>> {
            Ok(Vec::new())
        }

        fn favorites_of(
            &self,
            _user_id: u64,
            _query: &TopicQuery,
        ) -> ForumResult<Vec<TopicRecord>> {
            Ok(Vec::new())
        }

        fn add_engagement(&self, _user_id: u64, _topic_id: u64) -> ForumResult<bool> {
            Ok(false)
        }

        fn remove_engagement(&self, _user_id: u64, _topic_id: u64) -> ForumResult<bool> {
            Ok(false)
        }

        fn engagements_of_topic(&self, _topic_id: u64) -> ForumResult<Vec<u64>> {
            Ok(Vec::new())
        }

        fn engagements_of_user(
            &self,
            _user_id: u64,
            _query: &TopicQuery,
        ) -> ForumResult<Vec<TopicRecord>> {
            Ok(Vec::new())
        }

        fn recalculate_engagements(&self, _topic_id: u64) -> ForumResult<bool> {
            Ok(false)
        }

        fn add_moderator(&self, _forum_id: u64, _user_id: u64) -> ForumResult<bool> {
            Ok(false)
        }

        fn remove_moderator(&self, _forum_id: u64, _user_id: u64) -> ForumResult<bool> {
            Ok(false)
        }

        fn moderators_of(&self, _forum_id: u64) -> ForumResult<Vec<UserRecord>> {
            Ok(Vec::new())
        }

        fn moderator_ids_of(&self, _forum_id: u64) -> ForumResult<Vec<u64>> {
            Ok(Vec::new())
        }

        fn mark_spam(&self, _user_id: u64) -> ForumResult<bool> {
            Ok(false)
        }

        fn mark_ham(&self, _user_id: u64) -> ForumResult<bool> {
            Ok(false)
        }

        fn set_role(&self, _user_id: u64, _role: ForumRole) -> ForumResult<Option<String>> {
            Ok(None)
        }

        fn profile_url(&self, _user_id: u64) -> ForumResult<Option<String>> {
            Ok(None)
        }
    }

    #[test]
    fn numeric_identifier_resolves_by_id_without_login_lookup() {
        let store = LookupStore::with_users(vec![UserRecord::new(5465, "alice", "Alice")]);

        let user = resolve::resolve_user(&store, "5465").expect("resolve");

        assert_eq!(user.id, 5465);
        assert_eq!(user.display_name, "Alice");
        assert_eq!(store.lookups(), vec!["id:5465".to_string()]);
    }

    #[test]
    fn login_identifier_resolves_by_login_only() {
        let store = LookupStore::with_users(vec![UserRecord::new(12, "user_test", "Tester")]);

        let user = resolve::resolve_user(&store, "user_test").expect("resolve");

        assert_eq!(user.id, 12);
        assert_eq!(store.lookups(), vec!["login:user_test".to_string()]);
    }

    #[test]
    fn numeric_identifier_falls_back_to_login() {
        // a login made only of digits that is not also an ID
        let store = LookupStore::with_users(vec![UserRecord::new(7, "1984", "Winston")]);

        let user = resolve::resolve_user(&store, "1984").expect("resolve");

        assert_eq!(user.id, 7);
        assert_eq!(
            store.lookups(),
            vec!["id:1984".to_string(), "login:1984".to_string()]
        );
    }

    #[test]
    fn unknown_identifier_is_not_found() {
        let store = LookupStore::with_users(vec![UserRecord::new(1, "admin", "Admin")]);

        let err = resolve::resolve_user(&store, "nobody").unwrap_err();
        assert!(matches!(err, ForumError::UserNotFound(ref raw) if raw == "nobody"));

        let err = resolve::resolve_user(&store, "404").unwrap_err();
        assert!(matches!(err, ForumError::UserNotFound(_)));
        assert!(err.to_string().contains("No user found by that username or ID"));
    }

    #[test]
    fn numeric_id_accepts_only_positive_decimal_literals() {
        assert_eq!(resolve::numeric_id("42"), Some(42));
        assert_eq!(resolve::numeric_id(" 42 "), Some(42));
        assert_eq!(resolve::numeric_id("0"), None);
        assert_eq!(resolve::numeric_id("-3"), None);
        assert_eq!(resolve::numeric_id("+3"), None);
        assert_eq!(resolve::numeric_id("4e2"), None);
        assert_eq!(resolve::numeric_id(""), None);
        assert_eq!(resolve::numeric_id("99999999999999999999999"), None);
    }

    #[test]
    fn guard_reports_missing_topic_and_forum() {
        let store = LookupStore {
            topics: vec![65476],
            forums: vec![545646],
            ..LookupStore::default()
        };

        assert!(guard::assert_topic(&store, 65476).is_ok());
        assert!(guard::assert_forum(&store, 545646).is_ok());

        let err = guard::assert_topic(&store, 1).unwrap_err();
        assert!(matches!(
            err,
            ForumError::EntityNotFound {
                kind: EntityKind::Topic,
                id: 1
            }
        ));
        assert!(err.to_string().contains("No topic found by that ID"));

        let err = guard::assert_forum(&store, 2).unwrap_err();
        assert!(err.to_string().contains("No forum found by that ID"));
    }

    #[test]
    fn format_spec_selects_default_and_rejects_unsupported() {
        const LIST_FORMATS: FormatSpec = FormatSpec::new(
            &[FormatMode::Table, FormatMode::Ids, FormatMode::Count],
            FormatMode::Table,
        );

        assert_eq!(LIST_FORMATS.select(None).unwrap(), FormatMode::Table);
        assert_eq!(LIST_FORMATS.select(Some(FormatMode::Ids)).unwrap(), FormatMode::Ids);

        let err = LIST_FORMATS.select(Some(FormatMode::Yaml)).unwrap_err();
        match err {
            ForumError::InvalidFormatMode { mode, supported } => {
                assert_eq!(mode, FormatMode::Yaml);
                assert_eq!(supported, "table, ids, count");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn format_mode_parses_known_names() {
        assert_eq!("json".parse::<FormatMode>().unwrap(), FormatMode::Json);
        assert_eq!("YAML".parse::<FormatMode>().unwrap(), FormatMode::Yaml);
        assert!("haml".parse::<FormatMode>().is_err());
    }

    #[test]
    fn unknown_roles_fall_back_to_participant() {
        assert_eq!(ForumRole::parse_or_default("moderator"), ForumRole::Moderator);
        assert_eq!(ForumRole::parse_or_default(" Keymaster "), ForumRole::Keymaster);
        assert_eq!(ForumRole::parse_or_default("blocked"), ForumRole::Blocked);
        assert_eq!(ForumRole::parse_or_default("admin"), ForumRole::Participant);
        assert_eq!(ForumRole::parse_or_default(""), ForumRole::Participant);
    }

    #[test]
    fn topic_query_carries_limit() {
        let query = TopicQuery::default().with_limit(Some(3));
        assert_eq!(query.limit, Some(3));
        assert_eq!(TopicQuery::default().limit, None);
    }

    #[test]
    fn test_dummy_forum_store() {
        let store = DummyForumStore;

        assert!(matches!(
            store.lookup_user_by_id(1),
            Err(ForumError::UnsupportedOperation(_))
        ));
        assert!(matches!(
            resolve::resolve_user(&store, "admin"),
            Err(ForumError::UnsupportedOperation(_))
        ));
        // default permalink implementation
        assert!(matches!(store.topic_url(1), Ok(None)));
    }
}
