use std::sync::Arc;

use invocation_logger::{CallValue, Fields, Introspect, Logged, LoggingInterceptor, ToCallValue};

#[derive(Debug, Clone)]
struct Profile {
    first_name: String,
    last_name: String,
}

impl Profile {
    fn first_name(&self) -> &str {
        &self.first_name
    }

    fn last_name(&self) -> &str {
        &self.last_name
    }

    fn nickname(&self) -> Result<&str, &'static str> {
        Err("no nickname")
    }
}

impl Introspect for Profile {
    fn type_name(&self) -> &str {
        "ProfileDTO"
    }

    fn accessors(&self, fields: &mut Fields<'_>) {
        fields
            .field("get_first_name", &self.first_name())
            .field("get_last_name", &self.last_name())
            .try_field("get_nickname", || self.nickname());
    }
}

impl ToCallValue for Profile {
    fn to_call_value(&self) -> CallValue<'_> {
        CallValue::structured(self)
    }
}

trait Directory {
    fn store(&mut self, profile: &Profile) -> usize;
    fn find(&self, last_name: &str) -> Option<Profile>;
}

#[derive(Debug, Default)]
struct MemoryDirectory {
    profiles: Vec<Profile>,
}

impl Directory for MemoryDirectory {
    fn store(&mut self, profile: &Profile) -> usize {
        self.profiles.push(profile.clone());
        self.profiles.len()
    }

    fn find(&self, last_name: &str) -> Option<Profile> {
        self.profiles
            .iter()
            .find(|profile| profile.last_name == last_name)
            .cloned()
    }
}

impl<D: Directory> Directory for Logged<D> {
    fn store(&mut self, profile: &Profile) -> usize {
        self.call_mut("store", &[CallValue::structured(profile)], |directory| {
            directory.store(profile)
        })
    }

    fn find(&self, last_name: &str) -> Option<Profile> {
        self.call("find", &[CallValue::str(last_name)], |directory| {
            directory.find(last_name)
        })
    }
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .init();

    let interceptor = Arc::new(LoggingInterceptor::new().deep_rendering(true));
    let mut directory = interceptor.wrap(MemoryDirectory::default());

    directory.store(&Profile {
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
    });

    if let Some(profile) = directory.find("Lovelace") {
        log::info!("Found {}", profile.first_name());
    }
    directory.find("Hopper");
}
