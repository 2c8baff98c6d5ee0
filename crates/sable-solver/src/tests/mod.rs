mod emptiness_tests;
