//! Built-in word catalog
//!
//! Simple objects that read well as a quick 2D line drawing. Some entries
//! appear in more than one group; the sampler tolerates that.

/// Default catalog of drawing prompts
pub const DRAWING_WORDS: &[&str] = &[
    // Shapes
    "circle", "square", "triangle", "rectangle", "oval", "diamond", "star", "heart", "cross", "plus",
    "arrow", "line", "dot", "curve", "zigzag", "wave", "spiral", "ring", "moon", "crescent",
    // Faces
    "face", "eye", "mouth", "smile", "nose", "ear", "head", "hair", "hat", "glasses",
    // Animals
    "cat", "dog", "fish", "bird", "duck", "pig", "cow", "bee", "ant", "snake",
    "rabbit", "mouse", "frog", "turtle", "butterfly", "spider", "worm", "snail", "bat", "owl",
    // Objects
    "cup", "ball", "book", "key", "pen", "spoon", "fork", "knife", "plate", "bottle",
    "bag", "box", "can", "jar", "coin", "button", "ring", "clock", "phone", "tv",
    // Transportation
    "car", "bus", "bike", "boat", "plane", "train", "truck", "wheel", "balloon", "kite",
    // Food
    "apple", "banana", "orange", "cake", "pizza", "ice cream", "cookie", "donut", "egg", "bread",
    "cheese", "hot dog", "hamburger", "pie", "lemon", "cherry", "grape", "carrot", "mushroom", "corn",
    // Nature
    "tree", "flower", "leaf", "grass", "sun", "cloud", "rain", "snow", "lightning", "rainbow",
    "mountain", "hill", "river", "lake", "fire", "rock", "cactus", "palm tree", "rose", "tulip",
    // Household
    "house", "door", "window", "table", "chair", "bed", "lamp", "umbrella", "broom", "scissors",
    "hammer", "nail", "saw", "brush", "comb", "soap", "towel", "mirror", "picture", "vase",
    // Clothing
    "shirt", "pants", "dress", "shoe", "sock", "gloves", "tie", "belt", "shorts", "skirt",
    // Symbols and signs
    "flag", "crown", "trophy", "medal", "gift", "present", "candle", "bell", "musical note", "peace sign",
    "stop sign", "arrow sign", "exclamation mark", "question mark", "dollar sign", "percent sign",
    "at sign", "hashtag", "ampersand", "checkmark",
    // Letters and numbers
    "letter a", "letter b", "letter c", "letter x", "letter o",
    "number 1", "number 2", "number 3", "number 8", "number 0",
    // Games and toys
    "dice", "cards", "chess piece", "puzzle piece", "yo-yo", "top", "ball", "kite", "balloon", "bubbles",
    // Office and school
    "paper", "pencil", "crayon", "marker", "eraser", "ruler", "stapler", "clip", "envelope", "stamp",
    // Tools
    "wrench", "screwdriver", "pliers", "rope", "chain", "hook", "magnet", "spring", "gear", "screw",
    // Parts and details
    "bone", "feather", "wing", "tail", "paw", "horn", "beak", "fin", "shell", "egg shell",
    "leaf shape", "petal", "stem", "branch", "twig", "acorn", "pinecone", "seed", "berry", "nut",
    "flame", "smoke cloud", "water drop", "icicle", "snowflake", "raindrop", "wind lines",
    "dust cloud", "bubble", "spark",
    "footprint", "handprint", "fingerprint", "shadow", "silhouette", "outline", "border", "frame",
    "edge", "corner",
    // Medical
    "bandage", "pill", "thermometer", "stethoscope", "syringe", "mask", "band-aid", "crutch",
    "wheelchair", "glasses frame",
];

/// Owned copy of [`DRAWING_WORDS`]
pub fn default_catalog() -> Vec<String> {
    DRAWING_WORDS.iter().map(|w| w.to_string()).collect()
}
