//! Vocabularies used by test manifests, EARL assertions and processor descriptions.

pub mod rdfatest {
    //! [RDFa test suite](http://rdfa.info/vocabs/rdfa-test#) vocabulary.
    use oxigraph::model::NamedNodeRef;

    pub const NAMESPACE: &str = "http://rdfa.info/vocabs/rdfa-test#";
    /// Links the test suite (or any other resource) to a processor under test.
    pub const PROCESSOR: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://rdfa.info/vocabs/rdfa-test#processor");
    /// Prefix of the predicates linking the suite to a version.
    pub const VERSION_PREFIX: &str = "http://rdfa.info/vocabs/rdfa-test#version/";
    /// Prefix of the predicates linking a version to the test case list of a host language.
    pub const HOST_LANGUAGE_PREFIX: &str = "http://rdfa.info/vocabs/rdfa-test#hostLanguage/";
}

pub mod earl {
    //! [EARL](https://www.w3.org/TR/EARL10-Schema/) vocabulary.
    use oxigraph::model::NamedNodeRef;

    pub const NAMESPACE: &str = "http://www.w3.org/ns/earl#";
    pub const ASSERTION: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/earl#Assertion");
    pub const RESULT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/earl#result");
    pub const OUTCOME: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/earl#outcome");
    pub const PASS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/earl#pass");
    pub const FAIL: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/earl#fail");
    pub const MODE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/earl#mode");
}

pub mod doap {
    //! [DOAP](http://usefulinc.com/ns/doap#) vocabulary.
    use oxigraph::model::NamedNodeRef;

    pub const NAMESPACE: &str = "http://usefulinc.com/ns/doap#";
    pub const NAME: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://usefulinc.com/ns/doap#name");
    pub const HOMEPAGE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://usefulinc.com/ns/doap#homepage");
    pub const DESCRIPTION: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://usefulinc.com/ns/doap#description");
    pub const PROGRAMMING_LANGUAGE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://usefulinc.com/ns/doap#programming-language");
}

pub mod dc {
    //! [Dublin Core terms](http://purl.org/dc/terms/) vocabulary.
    use oxigraph::model::NamedNodeRef;

    pub const NAMESPACE: &str = "http://purl.org/dc/terms/";
    pub const TITLE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/terms/title");
    pub const DESCRIPTION: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/terms/description");
    pub const CREATOR: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/terms/creator");
}
