//! In-memory shadow dataset served in Demo mode and during fallback.
//!
//! # Design
//! The store is owned by the client context, never synchronized with the
//! server, and mutated in place. Writes made here are visible only to later
//! reads of the same store. Created records get a synthesized id that is
//! time-derived but strictly increasing within the store, so two creates in
//! the same millisecond still get distinct ids.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::error::ApiError;
use crate::types::{Category, CategoryInput, CreateEventData, Event, EventFilter, UpdateEventData};

/// Placeholder used when an event references a category the store lacks.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

const SEED_CATEGORIES: [&str; 8] = [
    "Conference",
    "Workshop",
    "Seminar",
    "Webinar",
    "Meetup",
    "Hackathon",
    "Training",
    "Networking",
];

struct SeedEvent {
    title: &'static str,
    description: &'static str,
    venue: &'static str,
    date: (i32, u32, u32),
    time: (u32, u32),
    image: Option<&'static str>,
    category: &'static str,
}

const SEED_EVENTS: [SeedEvent; 6] = [
    SeedEvent {
        title: "Tech Conference 2024: Future of Development",
        description: "A hands-on conference for frontend and backend developers focusing on \
                      React, Next.js, Django, APIs, and scalable system design. Join industry \
                      experts for workshops, keynotes, and networking sessions covering the \
                      latest trends in web development.",
        venue: "Silicon Valley Convention Center",
        date: (2024, 12, 30),
        time: (9, 0),
        image: Some(
            "https://images.unsplash.com/photo-1540575467063-178a50c2df87?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80",
        ),
        category: "1",
    },
    SeedEvent {
        title: "React Workshop: Building Modern UIs",
        description: "Learn to build modern user interfaces with React and TypeScript. \
                      Hands-on coding session with experienced developers covering hooks, \
                      state management, and best practices.",
        venue: "Tech Hub Downtown",
        date: (2024, 12, 28),
        time: (10, 0),
        image: Some(
            "https://images.unsplash.com/photo-1517180102446-f3ece451e9d8?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80",
        ),
        category: "2",
    },
    SeedEvent {
        title: "AI & Machine Learning Seminar",
        description: "Explore the latest trends in artificial intelligence and machine \
                      learning. Expert speakers from leading tech companies will share \
                      insights on neural networks, deep learning, and practical AI \
                      applications.",
        venue: "University Auditorium",
        date: (2025, 1, 15),
        time: (14, 0),
        image: Some(
            "https://images.unsplash.com/photo-1485827404703-89b55fcc595e?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80",
        ),
        category: "3",
    },
    SeedEvent {
        title: "Remote Work Best Practices Webinar",
        description: "Learn effective strategies for remote work, team collaboration, and \
                      productivity in distributed teams. Discover tools and techniques for \
                      successful remote work culture.",
        venue: "Online Event",
        date: (2025, 1, 20),
        time: (16, 0),
        image: None,
        category: "4",
    },
    SeedEvent {
        title: "Local Developer Meetup",
        description: "Monthly gathering of local developers to share knowledge, network, and \
                      discuss the latest in software development. Pizza and drinks provided!",
        venue: "Community Center",
        date: (2025, 1, 10),
        time: (18, 30),
        image: Some(
            "https://images.unsplash.com/photo-1515187029135-18ee286d815b?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80",
        ),
        category: "5",
    },
    SeedEvent {
        title: "48-Hour Innovation Hackathon",
        description: "Build innovative solutions in 48 hours! Teams will compete to create \
                      the most creative and impactful applications. Prizes for top 3 teams.",
        venue: "Innovation Lab",
        date: (2025, 2, 1),
        time: (9, 0),
        image: Some(
            "https://images.unsplash.com/photo-1504384308090-c894fdcc538d?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80",
        ),
        category: "6",
    },
];

/// Client-owned categories and events.
#[derive(Debug, Clone, Default)]
pub struct DemoStore {
    categories: Vec<Category>,
    events: Vec<Event>,
    last_id: i64,
}

impl DemoStore {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The stock dataset: eight categories and six events.
    pub fn seeded() -> Self {
        let stamp = seed_timestamp();
        let categories: Vec<Category> = SEED_CATEGORIES
            .iter()
            .enumerate()
            .map(|(i, name)| Category {
                id: (i + 1).to_string(),
                name: name.to_string(),
                created_at: stamp,
                updated_at: stamp,
            })
            .collect();

        let mut store = Self {
            categories,
            events: Vec::new(),
            last_id: 0,
        };
        let events = SEED_EVENTS
            .iter()
            .enumerate()
            .filter_map(|(i, seed)| {
                let date = NaiveDate::from_ymd_opt(seed.date.0, seed.date.1, seed.date.2)?;
                let time = NaiveTime::from_hms_opt(seed.time.0, seed.time.1, 0)?;
                Some(Event {
                    id: (i + 1).to_string(),
                    title: seed.title.to_string(),
                    description: Some(seed.description.to_string()),
                    venue: seed.venue.to_string(),
                    date,
                    time,
                    image: seed.image.map(str::to_string),
                    category: seed.category.to_string(),
                    category_id: seed.category.to_string(),
                    category_name: store.category_name(seed.category),
                    created_at: stamp,
                    updated_at: stamp,
                })
            })
            .collect();
        store.events = events;
        store
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_events(mut self, events: Vec<Event>) -> Self {
        self.events = events;
        self
    }

    // ---- categories ----

    pub fn categories(&self) -> Vec<Category> {
        self.categories.clone()
    }

    pub fn category(&self, id: &str) -> Result<Category, ApiError> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    pub fn create_category(&mut self, input: &CategoryInput) -> Category {
        let now = Utc::now();
        let category = Category {
            id: self.next_id(now),
            name: input.name.clone(),
            created_at: now,
            updated_at: now,
        };
        self.categories.push(category.clone());
        category
    }

    pub fn update_category(&mut self, id: &str, input: &CategoryInput) -> Result<Category, ApiError> {
        let category = self
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(ApiError::NotFound)?;
        category.name = input.name.clone();
        category.updated_at = Utc::now();
        Ok(category.clone())
    }

    /// Removes the category if present. Missing ids are not an error.
    pub fn delete_category(&mut self, id: &str) {
        self.categories.retain(|c| c.id != id);
    }

    // ---- events ----

    pub fn events(&self, filter: &EventFilter) -> Vec<Event> {
        self.events
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect()
    }

    pub fn event(&self, id: &str) -> Result<Event, ApiError> {
        self.events
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    pub fn create_event(&mut self, data: &CreateEventData) -> Event {
        let now = Utc::now();
        let event = Event {
            id: self.next_id(now),
            title: data.title.clone(),
            description: data.description.clone(),
            venue: data.venue.clone(),
            date: data.date,
            time: data.time,
            image: data.image.clone(),
            category: data.category.clone(),
            category_id: data.category.clone(),
            category_name: self.category_name(&data.category),
            created_at: now,
            updated_at: now,
        };
        self.events.push(event.clone());
        event
    }

    /// Merge `data` onto the stored event. `category_name` is re-derived
    /// only when the update names a category.
    pub fn update_event(&mut self, id: &str, data: &UpdateEventData) -> Result<Event, ApiError> {
        let category_name = data.category.as_deref().map(|c| self.category_name(c));
        let event = self
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(ApiError::NotFound)?;

        if let Some(title) = &data.title {
            event.title = title.clone();
        }
        if let Some(description) = &data.description {
            event.description = Some(description.clone());
        }
        if let Some(venue) = &data.venue {
            event.venue = venue.clone();
        }
        if let Some(date) = data.date {
            event.date = date;
        }
        if let Some(time) = data.time {
            event.time = time;
        }
        if let Some(image) = &data.image {
            event.image = Some(image.clone());
        }
        if let (Some(category), Some(name)) = (&data.category, category_name) {
            event.category = category.clone();
            event.category_id = category.clone();
            event.category_name = name;
        }
        event.updated_at = Utc::now();
        Ok(event.clone())
    }

    /// Removes the event if present. Missing ids are not an error.
    pub fn delete_event(&mut self, id: &str) {
        self.events.retain(|e| e.id != id);
    }

    fn category_name(&self, id: &str) -> String {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string())
    }

    fn next_id(&mut self, now: DateTime<Utc>) -> String {
        self.last_id = now.timestamp_millis().max(self.last_id + 1);
        self.last_id.to_string()
    }
}

fn seed_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}
