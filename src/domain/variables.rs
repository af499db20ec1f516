// Variable request domain model

/// Ordered list of variable names sent with a request.
///
/// The API answers positionally: the i-th decoded value belongs to the i-th
/// requested name, so the order here is the only thing tying values to names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VariableRequest {
    names: Vec<String>,
}

impl VariableRequest {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Comma-joined form used as the query parameter value
    pub fn to_query_value(&self) -> String {
        self.names.join(",")
    }
}
