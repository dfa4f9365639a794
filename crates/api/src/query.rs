use url::Url;

/// Ordered query string pairs. A name may repeat; each value keeps its own pair.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl ToString) -> &mut Self {
        self.pairs.push((name.into(), value.to_string()));
        self
    }

    pub fn push_opt<V: ToString>(&mut self, name: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.push(name, value);
        }
        self
    }

    pub fn push_all<I, V>(&mut self, name: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        for value in values {
            self.push(name, value);
        }
        self
    }

    /// Splits a comma separated command line value into one pair per token.
    pub fn push_list(&mut self, name: &str, list: &str) -> &mut Self {
        self.push_all(name, split_list(list))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Values recorded under `name`, in insertion order.
    pub fn values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub(crate) fn apply(&self, url: &mut Url) {
        if self.pairs.is_empty() {
            return;
        }
        let mut serializer = url.query_pairs_mut();
        for (name, value) in &self.pairs {
            serializer.append_pair(name, value);
        }
    }
}

pub fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|token| !token.is_empty())
}

/// Body format requested from endpoints that can export more than JSON.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ResponseFormat {
    #[default]
    Json,
    Csv,
    Vcf,
}

impl ResponseFormat {
    /// JSON is the service default and is never sent explicitly.
    pub fn query_value(self) -> Option<&'static str> {
        match self {
            ResponseFormat::Json => None,
            ResponseFormat::Csv => Some("CSV"),
            ResponseFormat::Vcf => Some("VCF"),
        }
    }

    pub fn is_streamed(self) -> bool {
        !matches!(self, ResponseFormat::Json)
    }
}
