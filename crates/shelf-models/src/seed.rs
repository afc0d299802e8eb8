//! Starter collection written on first run

use crate::book::Book;

pub fn initial_books() -> Vec<Book> {
    vec![
        Book::new(1, "The Silent Patient", "Alex Michaelides", "Thriller", "2025-08-24")
            .with_notes(
                "This is the book that got me into reading thriller books. This will be the best \
                 thriller ever. Don't want to spoil the story. I borrowed this from Pranav after \
                 completing the Artemis fowl without any idea.",
            ),
        Book::new(2, "Artemis Fowl 1", "Eoin Colfer", "Fiction", "2025-08-10").with_notes(
            "Wanted to read this book series from class 10 after seeing this book with Abinav. \
             It's a good book even though it is meant for kids. Introduction of the butler was \
             sooo good and his fight with the troll was absolute cinema. After reading the book \
             I wanted to complete the series.",
        ),
        Book::new(3, "Anilaadum Mundril", "Na Muthukumar", "Simple", "2025-01-10").with_notes(
            "It’s a Tamil book I started reading for distraction during placements. It really \
             did the job by distracting me and taking me back to my childhood days. The book \
             contains letters the writer intended to write to each of his relatives. I didn’t \
             read all of them — only the ones I felt connected to. The letters to the mother, \
             father, sister, and Periyappa were wonderful. I may reread them again!",
        ),
        Book::new(4, "The Alchemist", "Paulo Coelho", "Simple", "2024-04-05").with_notes(
            "A simple story about following your dreams. Sowshi's book and I randomly started \
             reading the book. Many parts were boring, like the superstitious stuff, but it’s a \
             good book that I can reread.",
        ),
        Book::new(1763824855752, "Spider's Web", "Agatha Christy", "Thriller", "2025-09-14")
            .with_notes(
                "I bought this book in second hand market for Rs.70 in a good condition. i \
                 didn't even know who was Agatha christy when I bought this. Completed this book \
                 during a trip to Thirchendur. The story was average but not that bad. It was \
                 little funny here and there but the final revealing of the murderer was not \
                 that satisfying. Once readable!!",
            ),
        Book::new(1763825123015, "Verity", "Colleen Hoover", "Thriller", "2025-09-28").with_notes(
            "I borrowed it from Pragathy after her recommendations for Thriller. The story was \
             nice and it kept me in the edge of the seat throughout the read. The ending twist \
             was satisfying and the open ending kept me hanging. Siva was not satisfied with the \
             open ending.",
        ),
        Book::new(
            1763825363967,
            "Artemis Fowl 2 (The Arctic Incident)",
            "Eoin Colfer",
            "Fiction",
            "2025-11-08",
        )
        .with_notes(
            "In this book Artemis will find his father and also realizes he is useless in many \
             scenarios. The part where they fight against opal was good and interesting. But not \
             that good. ",
        ),
    ]
}
