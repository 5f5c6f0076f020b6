use crate::formula::Formula;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

/// Parameters of a list request against one table.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use]
pub struct SelectQuery {
    pub filter: Option<Formula>,
    /// Fields to return. Empty means all fields.
    pub fields: Vec<String>,
    pub sort: Vec<Sort>,
}

impl SelectQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, formula: Formula) -> Self {
        self.filter = Some(formula);
        self
    }

    pub fn fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn sort_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort.push(Sort {
            field: field.into(),
            direction,
        });
        self
    }

    /// Query-string pairs for one page request, unencoded.
    #[must_use]
    pub fn to_params(&self, page_size: Option<u32>, offset: Option<&str>) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(filter) = &self.filter {
            params.push(("filterByFormula".to_owned(), filter.to_string()));
        }
        for field in &self.fields {
            params.push(("fields[]".to_owned(), field.clone()));
        }
        for (i, sort) in self.sort.iter().enumerate() {
            params.push((format!("sort[{i}][field]"), sort.field.clone()));
            params.push((format!("sort[{i}][direction]"), sort.direction.as_str().to_owned()));
        }
        if let Some(size) = page_size {
            params.push(("pageSize".to_owned(), size.to_string()));
        }
        if let Some(offset) = offset {
            params.push(("offset".to_owned(), offset.to_owned()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_follow_list_api_naming() {
        let q = SelectQuery::new()
            .filter(Formula::field("code").equals(Formula::number(1001)))
            .fields(["code", "name"])
            .sort_by("code", SortDirection::Asc)
            .sort_by("name", SortDirection::Desc);

        let params = q.to_params(Some(50), Some("itr/rec1"));
        let expected: Vec<(String, String)> = [
            ("filterByFormula", "{code} = 1001"),
            ("fields[]", "code"),
            ("fields[]", "name"),
            ("sort[0][field]", "code"),
            ("sort[0][direction]", "asc"),
            ("sort[1][field]", "name"),
            ("sort[1][direction]", "desc"),
            ("pageSize", "50"),
            ("offset", "itr/rec1"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();

        assert_eq!(params, expected);
    }

    #[test]
    fn empty_query_has_no_params() {
        assert!(SelectQuery::new().to_params(None, None).is_empty());
    }
}
