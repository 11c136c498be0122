//! Harptos event service entry point.
//! Day-scoped event storage split into CRUD and query submodules.

use rusqlite::Connection;

pub mod crud;
pub mod queries;
mod shared;

/// Service for managing campaign events stored in SQLite.
pub struct EventService<'a> {
    pub(crate) conn: &'a Connection,
}

impl<'a> EventService<'a> {
    /// Create a new EventService with a database connection
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CalendarError;
    use crate::models::event::Event;
    use crate::models::harptos::HarptosDate;
    use crate::services::database::Database;
    use chrono::NaiveDate;

    fn setup_test_db() -> Database {
        let db = Database::new(":memory:").unwrap();
        db.initialize_schema().unwrap();
        db
    }

    fn sample_event() -> Event {
        Event::builder()
            .on(1492, 1, 3)
            .title("Left Baldur's Gate")
            .build()
            .unwrap()
    }

    #[test]
    fn test_create_event() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        let event = sample_event();
        let created = service.create(event.clone()).unwrap();

        assert!(created.id.is_some());
        assert_eq!(created.title, event.title);
        assert!(created.created_at.is_some());
        assert!(created.updated_at.is_some());
    }

    #[test]
    fn test_create_event_with_optional_fields() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        let real = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let event = Event::builder()
            .on(1492, 7, 31)
            .title("Midsummer revel")
            .notes("The bard lost a bet.\nSecond line.")
            .real_world_date(real)
            .build()
            .unwrap();

        let created = service.create(event).unwrap();
        let stored = service.get(created.id.unwrap()).unwrap().unwrap();
        assert_eq!(stored.notes, created.notes);
        assert_eq!(stored.real_world_date, Some(real));
        assert_eq!(stored.date(), HarptosDate::new(1492, 7, 31).unwrap());
    }

    #[test]
    fn test_create_rejects_invalid_day() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        let mut event = sample_event();
        event.month = 2;
        event.day = 31;

        let err = service.create(event).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CalendarError>(),
            Some(CalendarError::InvalidDate { month: 2, day: 31, .. })
        ));
        assert!(service.list_all(true).unwrap().is_empty());
    }

    #[test]
    fn test_create_normalized_clamps_day() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        let mut event = sample_event();
        event.month = 2;
        event.day = 31;

        let created = service.create_normalized(event).unwrap();
        assert_eq!((created.month, created.day), (2, 30));

        let stored = service.get(created.id.unwrap()).unwrap().unwrap();
        assert_eq!((stored.month, stored.day), (2, 30));
    }

    #[test]
    fn test_get_nonexistent_event() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        assert!(service.get(999).unwrap().is_none());
    }

    #[test]
    fn test_update_keeps_date() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        let mut event = service.create(sample_event()).unwrap();
        event.title = Some("Updated Title".to_string());
        event.notes = Some("New notes".to_string());
        event.day = 20;

        service.update(&event).unwrap();

        let updated = service.get(event.id.unwrap()).unwrap().unwrap();
        assert_eq!(updated.title, Some("Updated Title".to_string()));
        assert_eq!(updated.notes, Some("New notes".to_string()));
        assert_eq!(updated.day, 3, "Day is fixed once created");
    }

    #[test]
    fn test_update_nonexistent_event() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        let mut event = sample_event();
        event.id = Some(999);

        let err = service.update(&event).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CalendarError>(),
            Some(CalendarError::EventNotFound(999))
        ));
    }

    #[test]
    fn test_delete_event() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        let id = service.create(sample_event()).unwrap().id.unwrap();
        service.delete(id).unwrap();

        assert!(service.get(id).unwrap().is_none());
    }

    #[test]
    fn test_delete_nonexistent_event() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        assert!(service.delete(999).is_err());
    }

    #[test]
    fn test_list_for_day() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        let first = service.create(sample_event()).unwrap();
        let second = service.create(sample_event()).unwrap();
        service
            .create(Event::builder().on(1492, 1, 4).build().unwrap())
            .unwrap();
        service
            .create(Event::builder().on(1493, 1, 3).build().unwrap())
            .unwrap();

        let events = service.list(1492, 1, 3).unwrap();
        let ids: Vec<_> = events.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[test]
    fn test_hidden_events_are_filtered() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        let id = service.create(sample_event()).unwrap().id.unwrap();
        service.set_hidden(id, true).unwrap();

        assert!(service.list(1492, 1, 3).unwrap().is_empty());
        assert!(service.list_all(false).unwrap().is_empty());
        assert_eq!(service.list_all(true).unwrap().len(), 1);

        service.set_hidden(id, false).unwrap();
        assert_eq!(service.list(1492, 1, 3).unwrap().len(), 1);
    }

    #[test]
    fn test_list_for_month_in_day_order() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        for day in [31, 2, 15] {
            service
                .create(Event::builder().on(1492, 4, day).build().unwrap())
                .unwrap();
        }

        let days: Vec<u32> = service
            .list_for_month(1492, 4)
            .unwrap()
            .iter()
            .map(|e| e.day)
            .collect();
        assert_eq!(days, vec![2, 15, 31]);
    }

    #[test]
    fn test_search() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        service.create(sample_event()).unwrap();
        service
            .create(
                Event::builder()
                    .on(1492, 2, 1)
                    .notes("Dragon sighted near the GATE")
                    .build()
                    .unwrap(),
            )
            .unwrap();
        service
            .create(Event::builder().on(1492, 2, 2).title("Rest").build().unwrap())
            .unwrap();

        assert_eq!(service.search("gate").unwrap().len(), 2);
        assert_eq!(service.search("dragon").unwrap().len(), 1);
        assert!(service.search("   ").unwrap().is_empty());
    }

    #[test]
    fn test_search_treats_wildcards_literally() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        service.create(sample_event()).unwrap();
        service
            .create(Event::builder().on(1492, 2, 2).title("Rest").build().unwrap())
            .unwrap();
        service
            .create(
                Event::builder()
                    .on(1492, 2, 3)
                    .title("Won 50% of the pot")
                    .notes("snake_eyes twice")
                    .build()
                    .unwrap(),
            )
            .unwrap();

        assert_eq!(service.search("%").unwrap().len(), 1);
        assert_eq!(service.search("_").unwrap().len(), 1);
        assert_eq!(service.search("50%").unwrap().len(), 1);
        assert!(service.search("\\").unwrap().is_empty());
    }
}
