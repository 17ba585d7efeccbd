/// Redis key construction for worker documents.
#[derive(Debug, Clone)]
pub struct KeyContext<'a> {
    pub prefix: &'a str,
    pub service: &'a str,
}

impl<'a> KeyContext<'a> {
    pub fn new(prefix: &'a str, service: &'a str) -> Self {
        Self { prefix, service }
    }

    pub fn entity(&self, collection: &str, entity_id: &str) -> String {
        format!("{}:{}:{}:{}", self.prefix, self.service, collection, entity_id)
    }

    /// Sorted set holding every entity id of a collection, scored by creation time.
    pub fn index(&self, collection: &str) -> String {
        format!("{}:{}:{}:index", self.prefix, self.service, collection)
    }

    /// Counter handing out insertion positions for the collection index.
    pub fn sequence(&self, collection: &str) -> String {
        format!("{}:{}:{}:seq", self.prefix, self.service, collection)
    }

    /// Key owning a unique field value. Holds the id of the entity that claimed it.
    /// Format: prefix:service:collection:unique:field:value
    pub fn unique(&self, collection: &str, field: &str, value: &str) -> String {
        format!(
            "{}:{}:{}:unique:{}:{}",
            self.prefix, self.service, collection, field, value
        )
    }

    /// Glob matching every key of the service under this prefix.
    pub fn service_pattern(&self) -> String {
        format!("{}:{}:*", self.prefix, self.service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_entity_keys() {
        let ctx = KeyContext::new("gig", "gigconnect");
        assert_eq!(ctx.entity("workers", "abc"), "gig:gigconnect:workers:abc");
    }

    #[test]
    fn builds_index_and_unique_keys() {
        let ctx = KeyContext::new("gig", "gigconnect");
        assert_eq!(ctx.index("workers"), "gig:gigconnect:workers:index");
        assert_eq!(
            ctx.unique("workers", "contact", "a@b.c"),
            "gig:gigconnect:workers:unique:contact:a@b.c"
        );
        assert_eq!(ctx.sequence("workers"), "gig:gigconnect:workers:seq");
        assert_eq!(ctx.service_pattern(), "gig:gigconnect:*");
    }
}
