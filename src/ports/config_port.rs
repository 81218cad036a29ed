//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// Values of `prefix_1`, `prefix_2`, ... in order, stopping at the first
    /// missing index. Blank values are kept so callers can decide what they mean.
    fn get_numbered(&self, section: &str, prefix: &str) -> Vec<String> {
        (1..)
            .map_while(|n| self.get_string(section, &format!("{}_{}", prefix, n)))
            .collect()
    }
}
